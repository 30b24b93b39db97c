//! 大模型客户端
//!
//! 服务层只依赖 [`LlmClient`]，生产环境使用 [`AnthropicClient`]，
//! 测试中使用按脚本返回的客户端。

mod anthropic;

pub use anthropic::AnthropicClient;

use async_trait::async_trait;

use crate::errors::Result;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 发送一轮对话，返回模型输出的纯文本
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::errors::EduMarketError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 依次返回预设响应，并记录收到的用户提示词
    pub struct ScriptedLlm {
        responses: Mutex<VecDeque<Result<String>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        pub fn new<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from([Err(EduMarketError::upstream(message))])),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(EduMarketError::upstream("script exhausted")))
        }
    }
}
