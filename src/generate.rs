//! Client for the external text-generation service.
//!
//! The service turns a [`StructuredRecord`] into prose: plant descriptions and
//! short-video script suggestions. It speaks the OpenAI-style chat-completions
//! protocol over blocking HTTP with a bounded timeout. Failures never escape
//! as panics or errors from the public entry points; they come back as a
//! [`GenerationOutcome::Failed`] carrying a readable message.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::GenerateError;
use crate::query::StructuredRecord;

/// Request for a descriptive text about one plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRequest {
    #[serde(default = "default_plant_name")]
    pub plant_name: String,
    #[serde(default)]
    pub info: StructuredRecord,
    /// Extra free-text instructions.
    #[serde(default)]
    pub addition: String,
    /// Number of alternative styles to produce.
    #[serde(default = "default_count")]
    pub n: u32,
}

/// Request for video/post script suggestions about one plant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRequest {
    #[serde(default = "default_plant_name")]
    pub plant_name: String,
    #[serde(default)]
    pub info: StructuredRecord,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_count")]
    pub n: u32,
}

fn default_plant_name() -> String {
    "未知植物".into()
}
fn default_platform() -> String {
    "video".into()
}
fn default_audience() -> String {
    "大众".into()
}
fn default_count() -> u32 {
    1
}

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Generated { text: String },
    Failed { error: String },
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated { .. })
    }
}

/// (predicate, description heading, script heading, fallback when absent).
const PROMPT_FIELDS: &[(&str, &str, &str, &str)] = &[
    ("属于科", "科", "科", "未知"),
    ("属于属", "属", "属", "未知"),
    ("拉丁学名", "拉丁学名", "拉丁学名", "未知"),
    ("别名", "别名", "别名", "无"),
    ("花期", "花期", "花期", "未知"),
    ("果期", "果期", "果期", "未知"),
    ("国内分布于", "国内分布地", "国内分布", "未知"),
    ("国际分布于", "国际分布地", "国际分布", "未知"),
    ("生境", "生境", "生境", "未知"),
    ("特征", "植物特征", "植物特征", "未知"),
    ("治疗", "治疗", "治疗/药用", "未知"),
];

fn field_value(info: &StructuredRecord, pred: &str, fallback: &str) -> String {
    info.get(pred)
        .map(|v| v.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

/// Description facts, one `【heading】：value` line per field.
fn describe_facts(info: &StructuredRecord) -> String {
    PROMPT_FIELDS
        .iter()
        .map(|(pred, heading, _, fallback)| {
            format!("【{heading}】：{}\n", field_value(info, pred, fallback))
        })
        .collect()
}

/// Script facts, one plain `heading：value` line per field.
fn script_facts(info: &StructuredRecord) -> String {
    PROMPT_FIELDS
        .iter()
        .map(|(pred, _, heading, fallback)| {
            format!("{heading}：{}\n", field_value(info, pred, fallback))
        })
        .collect()
}

/// Prompt asking for a natural-language description of a plant.
pub fn describe_prompt(req: &DescribeRequest) -> String {
    let addition = match req.addition.trim() {
        "" => "无",
        a => a,
    };
    format!(
        "你是一个植物学专家，以下是植物「{name}」的结构化知识信息，根据所提供的数据资料，\
         撰写关于植物的文字介绍。请以自然流畅的方式组织语言，仅描述已有信息，\
         不需要对缺失内容做出任何说明或标注。\n\n\
         {facts}\n\
         【格式说明】\n\
         1. 以植物中文名和拉丁学名开始，格式为：植物中文名（XX科XX属，拉丁名），\
         若植物存在别名，请以“又名××”的格式紧随其后；若无别名信息，请省略。\n\
         2. 花果期介绍：若花期信息存在，则输出句子“花期为××。” 若果期信息存在，\
         则输出句子“果期为××。” 任一信息缺失或为“未知”时，请智能省略对应句子。\n\
         3. 分布情况：国内分布请以“在中国，分布于××等地”描述。若涉及多个省份，\
         请按“省份+代表性地名”的方式归纳。国际分布表达为“亦见于××地区”。\n\
         4. 生境描述：若存在，则以“多生于××环境”总结；如为“未知”，请省略整段。\n\
         5. 分析适应性：可采用“××因其××特性，与××地区的××环境相适应”结构。\n\n\
         请生成 {n} 种不同风格或结构的文本（如无法实现，则生成完整描述即可）。\n\n\
         【补充要求】：{addition}\n",
        name = req.plant_name,
        facts = describe_facts(&req.info),
        n = req.n.max(1),
    )
}

/// Prompt asking for script suggestions targeted at a platform and audience.
pub fn script_prompt(req: &ScriptRequest) -> String {
    format!(
        "你是一位专业的植物学内容策划师。用户查询了植物「{name}」的信息，需要为平台「{platform}」\
         面向「{audience}」创作{n}套脚本建议。以下为植物结构化信息：\n\n\
         {facts}",
        name = req.plant_name,
        platform = req.platform,
        audience = req.audience,
        facts = script_facts(&req.info),
        n = req.n.max(1),
    )
}

/// Extract the first choice's message content from a chat-completions body.
pub fn parse_completion(body: &str) -> Result<String, GenerateError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| GenerateError::ParseError {
            message: e.to_string(),
        })?;
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| GenerateError::ParseError {
            message: "missing 'choices[0].message.content' field".into(),
        })
}

/// Blocking client for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    config: GenerationConfig,
}

impl GenerationClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Send one user prompt and return the completion text.
    pub fn complete(&self, prompt: &str, timeout_secs: u64) -> Result<String, GenerateError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerateError::MissingApiKey)?;

        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build();

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.config.temperature,
        });
        let body_str = serde_json::to_string(&body).map_err(|e| GenerateError::RequestFailed {
            message: format!("JSON serialize error: {e}"),
        })?;

        let resp = agent
            .post(&self.config.api_url)
            .set("Authorization", &format!("Bearer {api_key}"))
            .set("Content-Type", "application/json")
            .send_string(&body_str);

        let resp = match resp {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(GenerateError::Status { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(GenerateError::RequestFailed {
                    message: transport.to_string(),
                });
            }
        };

        let resp_str = resp.into_string().map_err(|e| GenerateError::ParseError {
            message: e.to_string(),
        })?;
        parse_completion(&resp_str)
    }

    /// Generate a plant description.
    pub fn describe(&self, req: &DescribeRequest) -> GenerationOutcome {
        let prompt = describe_prompt(req);
        self.run(&prompt, self.config.timeout_secs, "生成失败")
    }

    /// Generate script suggestions.
    pub fn script_suggestions(&self, req: &ScriptRequest) -> GenerationOutcome {
        let prompt = script_prompt(req);
        self.run(&prompt, self.config.script_timeout_secs, "脚本生成失败")
    }

    /// Run a prompt, folding any failure into [`GenerationOutcome::Failed`].
    pub fn run(&self, prompt: &str, timeout_secs: u64, failure_prefix: &str) -> GenerationOutcome {
        match self.complete(prompt, timeout_secs) {
            Ok(text) => GenerationOutcome::Generated { text },
            Err(e) => {
                tracing::warn!(error = %e, model = %self.config.model, "text generation failed");
                GenerationOutcome::Failed {
                    error: format!("{failure_prefix}：{e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lotus_info() -> StructuredRecord {
        let mut info = StructuredRecord::new();
        info.insert("属于科", "睡莲科".into());
        info.insert("别名", "莲".into());
        info.insert("别名", "荷花".into());
        info
    }

    #[test]
    fn describe_prompt_fills_known_fields_and_fallbacks() {
        let prompt = describe_prompt(&DescribeRequest {
            plant_name: "Lotus".into(),
            info: lotus_info(),
            addition: "  ".into(),
            n: 2,
        });
        assert!(prompt.contains("「Lotus」"));
        assert!(prompt.contains("【科】：睡莲科"));
        assert!(prompt.contains("【别名】：莲、荷花"));
        assert!(prompt.contains("【花期】：未知"));
        assert!(prompt.contains("【国内分布地】：未知"));
        assert!(prompt.contains("【治疗】：未知"));
        assert!(prompt.contains("请生成 2 种"));
        assert!(prompt.contains("【补充要求】：无"));
    }

    #[test]
    fn describe_prompt_carries_all_format_rules() {
        let prompt = describe_prompt(&DescribeRequest {
            plant_name: "Lotus".into(),
            info: lotus_info(),
            addition: "适合儿童阅读".into(),
            n: 1,
        });
        assert!(prompt.contains("【格式说明】"));
        assert!(prompt.contains("植物中文名（XX科XX属，拉丁名）"));
        assert!(prompt.contains("又名××"));
        assert!(prompt.contains("“花期为××。”"));
        assert!(prompt.contains("“果期为××。”"));
        assert!(prompt.contains("多生于××环境"));
        assert!(prompt.contains("5. 分析适应性"));
        assert!(prompt.contains("【补充要求】：适合儿童阅读"));
    }

    #[test]
    fn script_prompt_names_platform_and_audience() {
        let prompt = script_prompt(&ScriptRequest {
            plant_name: "Lotus".into(),
            info: lotus_info(),
            platform: "抖音".into(),
            audience: "学生".into(),
            n: 0,
        });
        assert!(prompt.contains("「抖音」"));
        assert!(prompt.contains("「学生」"));
        assert!(prompt.contains("创作1套"));
        assert!(prompt.contains("科：睡莲科\n"));
        assert!(prompt.contains("国内分布：未知"));
        assert!(prompt.contains("治疗/药用：未知"));
        assert!(!prompt.contains("【"));
    }

    #[test]
    fn request_defaults_from_sparse_json() {
        let req: ScriptRequest = serde_json::from_str(r#"{"info": {"花期": "六月"}}"#).unwrap();
        assert_eq!(req.plant_name, "未知植物");
        assert_eq!(req.platform, "video");
        assert_eq!(req.audience, "大众");
        assert_eq!(req.n, 1);
        assert_eq!(req.info.len(), 1);
    }

    #[test]
    fn parses_completion_body() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"荷花，睡莲科。"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "荷花，睡莲科。");
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(GenerateError::ParseError { .. })
        ));
        assert!(parse_completion("not json").is_err());
    }

    #[test]
    fn missing_api_key_is_a_tagged_failure() {
        let client = GenerationClient::new(GenerationConfig::default());
        let outcome = client.describe(&DescribeRequest {
            plant_name: "Lotus".into(),
            info: lotus_info(),
            addition: String::new(),
            n: 1,
        });
        match &outcome {
            GenerationOutcome::Failed { error } => assert!(error.starts_with("生成失败")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
    }

    #[test]
    fn unreachable_service_is_a_tagged_failure() {
        let client = GenerationClient::new(GenerationConfig {
            api_url: "http://127.0.0.1:9/v1/chat/completions".into(),
            api_key: Some("test-key".into()),
            timeout_secs: 2,
            ..Default::default()
        });
        let outcome = client.run("hello", 2, "生成失败");
        assert!(!outcome.is_generated());
    }
}
