//! Command-line surface: argument parsing and the end-to-end run.
//!
//! `execute` wires the collaborators around the persona engine:
//! profile URL → username → fetch → analyze → report → optional
//! narratives → file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::llms::narrative::{append_narrative, NarrativeProvider};
use crate::llms::providers::{HuggingFaceNarrator, OpenAiNarrator};
use crate::persona;
use crate::source::{extract_username, RedditClient};
use crate::utilities::config::PersonaConfig;
use crate::utilities::file_handler::ReportWriter;

#[derive(Debug, Clone, Parser)]
#[command(name = "reddit-persona")]
#[command(version, about = "Build a cited persona profile from a Reddit user's posts and comments")]
pub struct Cli {
    /// Reddit user profile URL, e.g. https://www.reddit.com/user/spez/
    pub profile_url: String,

    /// Append an OpenAI-generated narrative to the report
    #[arg(long)]
    pub use_llm: bool,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Append a Hugging Face-generated narrative to the report
    #[arg(long)]
    pub use_hf_llm: bool,

    /// Hugging Face API key
    #[arg(long, env = "HF_API_KEY", hide_env_values = true)]
    pub hf_api_key: Option<String>,

    /// YAML config file
    #[arg(long, env = "REDDIT_PERSONA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for the report file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Items fetched per listing
    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load the config file/environment and apply flag overrides.
    pub fn resolve_config(&self) -> Result<PersonaConfig> {
        let mut config = PersonaConfig::load(self.config.as_deref())?;
        self.apply_to(&mut config);
        Ok(config)
    }

    /// Flags take precedence over file and environment values.
    pub fn apply_to(&self, config: &mut PersonaConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
    }

    /// Providers the user asked for, in report order. Fails on a missing key.
    pub fn narrators(&self, config: &PersonaConfig) -> Result<Vec<Box<dyn NarrativeProvider>>> {
        let mut narrators: Vec<Box<dyn NarrativeProvider>> = Vec::new();
        if self.use_llm {
            narrators.push(Box::new(OpenAiNarrator::new(
                self.openai_api_key.clone(),
                &config.openai,
            )?));
        }
        if self.use_hf_llm {
            narrators.push(Box::new(HuggingFaceNarrator::new(
                self.hf_api_key.clone(),
                &config.huggingface,
            )?));
        }
        Ok(narrators)
    }
}

/// Run the whole flow and return the written report's path.
pub async fn execute(cli: &Cli, config: &PersonaConfig) -> Result<PathBuf> {
    let username = extract_username(&cli.profile_url)?;
    let narrators = cli.narrators(config)?;

    tracing::info!(%username, "fetching data");
    let client = RedditClient::new(config)?;
    let content = client
        .fetch_user_content(&username)
        .await
        .with_context(|| format!("fetching content for '{}'", username))?;

    if content.is_empty() {
        bail!("No data found for user '{}'", username);
    }

    let analysis = persona::analyze(&content.posts, &content.comments);
    let mut report = analysis.report(&username);

    if !narrators.is_empty() {
        let corpus = analysis.corpus();
        for narrator in &narrators {
            tracing::info!(provider = narrator.name(), model = narrator.model(), "running narrative analysis");
            let narrative = match narrator.analyze(&username, &corpus).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(provider = narrator.name(), error = %e, "narrative analysis failed");
                    format!("[{}]", e)
                }
            };
            report = append_narrative(&report, narrator.name(), &narrative);
        }
    }

    let writer = ReportWriter::new(config.output_dir.clone());
    let path = writer
        .write(&username, &report)
        .with_context(|| format!("writing report to {}", writer.path_for(&username).display()))?;
    tracing::info!(path = %path.display(), "user persona written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["reddit-persona"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    async fn reddit_with(comments: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/hiker/submitted.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "children": [] } })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/hiker/comments.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(comments))
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_parse_flags() {
        let cli = cli(&[
            "https://www.reddit.com/user/spez/",
            "--use-hf-llm",
            "--hf-api-key",
            "hf_x",
            "--limit",
            "20",
            "--output-dir",
            "out",
        ]);
        assert!(cli.use_hf_llm);
        assert!(!cli.use_llm);
        assert_eq!(cli.hf_api_key.as_deref(), Some("hf_x"));

        let mut config = PersonaConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.limit, 20);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_narrators_only_when_requested() {
        let config = PersonaConfig::default();
        let none = cli(&["https://www.reddit.com/user/spez/"]);
        assert!(none.narrators(&config).unwrap().is_empty());

        let both = cli(&[
            "https://www.reddit.com/user/spez/",
            "--use-llm",
            "--openai-api-key",
            "sk-x",
            "--use-hf-llm",
            "--hf-api-key",
            "hf_x",
        ]);
        let names: Vec<_> = both
            .narrators(&config)
            .unwrap()
            .iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(names, vec!["OpenAI", "Hugging Face"]);
    }

    #[tokio::test]
    async fn test_execute_writes_report() {
        let server = reddit_with(json!({ "data": { "children": [
            { "data": {
                "body": "I love hiking and I think everyone should try it. work has been hard lately lol",
                "subreddit": "hiking",
                "permalink": "/r/hiking/comments/h1/c1/"
            } }
        ] } }))
        .await;

        let out = tempfile::tempdir().unwrap();
        let config = PersonaConfig {
            reddit_base_url: server.uri(),
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };

        let path = execute(&cli(&["https://www.reddit.com/user/hiker/"]), &config)
            .await
            .unwrap();
        assert_eq!(path, out.path().join("hiker_persona.txt"));

        let report = std::fs::read_to_string(path).unwrap();
        assert!(report.contains("**Name**: Hiker (generated)"));
        assert!(report.contains("**Personality Traits**: Expressive"));
        assert!(report.contains("**Occupation**: Mentions work/job"));
        assert!(report.contains("[https://www.reddit.com/r/hiking/comments/h1/c1/]"));
        assert!(!report.contains("LLM Persona Analysis"));
    }

    #[tokio::test]
    async fn test_execute_rejects_user_without_content() {
        let server = reddit_with(json!({ "data": { "children": [] } })).await;
        let out = tempfile::tempdir().unwrap();
        let config = PersonaConfig {
            reddit_base_url: server.uri(),
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };

        let err = execute(&cli(&["https://www.reddit.com/user/hiker/"]), &config)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No data found for user 'hiker'"));
        assert!(!out.path().join("hiker_persona.txt").exists());
    }

    #[tokio::test]
    async fn test_execute_appends_narrative_failure_as_text() {
        let server = reddit_with(json!({ "data": { "children": [
            { "data": { "body": "anime lol", "subreddit": "anime", "permalink": "/r/anime/c/1/" } }
        ] } }))
        .await;
        Mock::given(method("POST"))
            .and(path("/models/org/model"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let out = tempfile::tempdir().unwrap();
        let mut config = PersonaConfig {
            reddit_base_url: server.uri(),
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        };
        config.huggingface.base_url = server.uri();
        config.huggingface.model = "org/model".into();

        let args = cli(&[
            "https://www.reddit.com/user/hiker/",
            "--use-hf-llm",
            "--hf-api-key",
            "hf_x",
        ]);
        let report = std::fs::read_to_string(execute(&args, &config).await.unwrap()).unwrap();
        assert!(report.ends_with(
            "\n\n---\n\n**LLM Persona Analysis (Hugging Face):**\n[Hugging Face API error 503: busy]"
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetch() {
        let err = execute(&cli(&["https://example.com/nobody"]), &PersonaConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid Reddit user profile URL"));
    }
}
