//! Subcommand implementations.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crux_ai::verify::{
    detect_crisis, detect_crisis_in, ClaimRequest, ClaimVerifier, CrisisCandidate, CrisisReport,
    EvidenceScorer, MemoryClaimStore, Verdict, VerdictExplainer,
};
use crux_ai::{ChatClient, ChatClientConfig, Conversation, StreamEnd};
use crux_common::{CruxError, Result, UserId};
use crux_config::{config_to_json, resolve_api_key, CruxConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::printer::stdout_observer;

/// Interactive chat on stdin until EOF, `/quit`, or Ctrl-C at the prompt.
pub async fn chat(config: &CruxConfig) -> Result<()> {
    let client = ChatClient::new(chat_client_config(config)?)?;
    let mut convo = Conversation::new()
        .with_greeting(&config.chat.greeting)
        .with_observer(stdout_observer());

    println!("{}", config.chat.greeting);
    println!("(/clear to start over, /quit to exit)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                convo.clear();
                println!("(conversation cleared)\n");
                continue;
            }
            input => {
                let end = run_turn(&mut convo, &client, input).await;
                println!("\n");
                match end {
                    Ok(StreamEnd::Cancelled) => println!("(stopped)\n"),
                    Ok(_) => {}
                    // The apology has already been printed.
                    Err(e) => debug!(error = %e, "turn ended with error"),
                }
            }
        }
    }

    info!(conversation = %convo.id(), messages = convo.message_count(), "chat ended");
    Ok(())
}

/// One question, answer streamed to stdout.
pub async fn ask(config: &CruxConfig, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        return Err(CruxError::InvalidInput("question is empty".into()));
    }

    let client = ChatClient::new(chat_client_config(config)?)?;
    let mut convo = Conversation::new()
        .with_greeting(&config.chat.greeting)
        .with_observer(stdout_observer());

    let end = run_turn(&mut convo, &client, message).await;
    println!();
    end?;
    Ok(())
}

/// Assess a claim and print the assessment as pretty JSON.
pub async fn verify(
    config: &CruxConfig,
    text: Option<String>,
    url: Option<String>,
    user: Option<String>,
) -> Result<()> {
    let request = ClaimRequest { text, url };
    request.validate()?;

    let user = user
        .map(|raw| {
            UserId::parse(&raw).ok_or_else(|| CruxError::InvalidInput("user id is blank".into()))
        })
        .transpose()?;

    let client = ChatClient::new(completion_client_config(config)?)?;
    let store = Arc::new(MemoryClaimStore::new());
    let verifier = ClaimVerifier::new(Arc::new(client)).with_store(store.clone());

    let assessment = verifier.verify(&request, user.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&assessment)?);

    for record in store.records().await {
        info!(id = %record.id, user = %record.user_id, verdict = ?record.verdict, "claim recorded");
    }
    Ok(())
}

/// Explain a verdict in the requested language.
pub async fn explain(config: &CruxConfig, text: &str, verdict: &str, lang: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CruxError::InvalidInput("claim text is empty".into()));
    }
    let verdict = parse_verdict(verdict)?;

    let client = ChatClient::new(completion_client_config(config)?)?;
    let explanation = VerdictExplainer::new(Arc::new(client))
        .explain(text, verdict, lang)
        .await?;
    println!("{explanation}");
    Ok(())
}

/// Score a claim against the given evidence and print the scores as JSON.
pub async fn score(config: &CruxConfig, text: &str, evidence: &[String]) -> Result<()> {
    if text.trim().is_empty() {
        return Err(CruxError::InvalidInput("claim text is empty".into()));
    }

    let client = ChatClient::new(completion_client_config(config)?)?;
    let scores = EvidenceScorer::new(Arc::new(client))
        .score(text, evidence)
        .await?;
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}

/// Screen claims for crisis keywords, optionally verifying each one first.
pub async fn crisis(config: &CruxConfig, claims: &[String], verify_first: bool) -> Result<()> {
    let report = if verify_first {
        verified_report(config, claims).await?
    } else {
        unverified_report(claims)
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub fn show_config(config: &CruxConfig) -> Result<()> {
    println!("{}", config_to_json(config));
    Ok(())
}

/// Verified claims are saved under this id so the store can be screened.
const LOCAL_USER: &str = "local";

async fn verified_report(config: &CruxConfig, claims: &[String]) -> Result<CrisisReport> {
    let user = UserId::parse(LOCAL_USER)
        .ok_or_else(|| CruxError::Other("local user id is blank".into()))?;
    let client = ChatClient::new(completion_client_config(config)?)?;
    let store = Arc::new(MemoryClaimStore::new());
    let verifier = ClaimVerifier::new(Arc::new(client)).with_store(store.clone());

    for claim in claims.iter().filter(|c| !c.trim().is_empty()) {
        let assessment = verifier
            .verify(&ClaimRequest::from_text(claim.as_str()), Some(&user))
            .await?;
        debug!(verdict = %assessment.verdict, "claim verified for screening");
    }
    detect_crisis_in(store.as_ref()).await
}

fn unverified_report(claims: &[String]) -> CrisisReport {
    let candidates: Vec<CrisisCandidate> = claims
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| CrisisCandidate::unverified(c.trim()))
        .collect();
    detect_crisis(&candidates)
}

/// Accept only the four verdict labels, in any case.
fn parse_verdict(raw: &str) -> Result<Verdict> {
    let verdict = Verdict::from_label(raw);
    if verdict.label() != raw.trim().to_ascii_uppercase() {
        return Err(CruxError::InvalidInput(format!(
            "unknown verdict {raw:?}; expected VERIFIED, FALSE, MIXED or UNVERIFIED"
        )));
    }
    Ok(verdict)
}

/// Send one turn, cancelling it if Ctrl-C arrives before it finishes.
async fn run_turn(
    convo: &mut Conversation,
    client: &ChatClient,
    input: &str,
) -> Result<StreamEnd> {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let result = convo.send(client, input, &cancel).await;
    watcher.abort();

    match result {
        Ok(outcome) => Ok(outcome.end),
        Err(e) => {
            warn!(error = %e, "chat turn failed");
            Err(e.into())
        }
    }
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        debug!("interrupt received, stopping reply");
        cancel.cancel();
    }
}

/// Streaming chat needs the chat key; completions fall back to it.
fn chat_client_config(config: &CruxConfig) -> Result<ChatClientConfig> {
    let chat_key = resolve_api_key(&config.chat.api_key_env)?;
    let completion_key =
        resolve_api_key(&config.completion.api_key_env).unwrap_or_else(|_| chat_key.clone());
    Ok(client_config(config, chat_key, completion_key))
}

/// Verification only talks to the completion API.
fn completion_client_config(config: &CruxConfig) -> Result<ChatClientConfig> {
    let completion_key = resolve_api_key(&config.completion.api_key_env)?;
    let chat_key = resolve_api_key(&config.chat.api_key_env).unwrap_or_default();
    Ok(client_config(config, chat_key, completion_key))
}

fn client_config(config: &CruxConfig, chat_key: String, completion_key: String) -> ChatClientConfig {
    let stream = &config.stream;
    // 0 disables the idle timeout.
    let idle_timeout = (stream.idle_timeout_secs > 0)
        .then(|| Duration::from_secs(u64::from(stream.idle_timeout_secs)));

    ChatClientConfig::new(&config.chat.endpoint, chat_key)
        .with_completion(&config.completion.endpoint, completion_key)
        .with_model(&config.completion.model)
        .with_temperature(config.completion.temperature)
        .with_connect_timeout(Duration::from_secs(u64::from(stream.connect_timeout_secs)))
        .with_idle_timeout(idle_timeout)
        .with_max_buffer_bytes(stream.max_buffer_bytes as usize)
}
