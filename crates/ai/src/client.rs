use async_openai::{Client, config::OpenAIConfig};
use querysim_shared::AiEnv;

pub(crate) fn client(env: &AiEnv) -> Client<OpenAIConfig> {
  let config = OpenAIConfig::new()
    .with_api_key(&env.openai_api_key)
    .with_api_base(&env.openai_base_url);

  Client::with_config(config)
}
