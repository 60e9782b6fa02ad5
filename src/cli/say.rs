//! TUI-less "say" command

use std::error::Error;
use std::io::Write;

use crate::api::ChatApi;
use crate::core::message::Message;
use crate::core::session::{Exchange, SessionAction, SessionRuntime, Status};
use crate::core::store::Store;
use crate::ui::renderer::classification_tag;

/// One-line rendering of a message for plain output.
pub fn format_message(message: &Message) -> String {
    let prefix = if message.is_user() { "You" } else { "Bot" };
    match classification_tag(message.classification).filter(|_| message.is_bot()) {
        Some(tag) => format!("{prefix}: {tag} {}", message.text),
        None => format!("{prefix}: {}", message.text),
    }
}

/// Send one message through the session and print the reply.
///
/// The exchange is appended to the persisted transcript exactly as it would
/// be from the interactive screen.
pub async fn run_say<S, A, W>(
    runtime: &mut SessionRuntime<S, A>,
    prompt: &[String],
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: Store,
    A: ChatApi + 'static,
    W: Write,
{
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: chatguard say <message>".into());
    }

    runtime.restore().await;
    runtime
        .dispatch(SessionAction::Submit { text: prompt })
        .await;

    let session = runtime.session();
    let reply = session
        .last_message()
        .filter(|message| message.is_bot())
        .ok_or("no reply was recorded")?;
    writeln!(out, "{}", format_message(reply))?;
    match session.last_exchange() {
        Some(Exchange::Answered {
            confidence: Some(confidence),
        }) => writeln!(
            out,
            "classification: {} (confidence {confidence:.2})",
            reply.classification
        )?,
        _ => writeln!(out, "classification: {}", reply.classification)?,
    }

    if let Status::StorageError(err) = session.status() {
        eprintln!("⚠️  Conversation was not saved: {err}");
    }
    match session.last_exchange() {
        Some(Exchange::Answered { .. }) => Ok(()),
        Some(Exchange::Failed) | None => Err("the chat service did not answer".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Classification;
    use crate::core::session::FALLBACK_REPLY;
    use crate::core::store::{self, MemoryStore};
    use crate::api::ChatResponse;
    use crate::utils::test_utils::{FailingStore, ScriptedApi, ScriptedReply};

    fn args(text: &str) -> Vec<String> {
        text.split(' ').map(str::to_string).collect()
    }

    #[tokio::test]
    async fn prints_reply_with_classification() {
        let api = ScriptedApi::new().reply("Please keep it civil.", Some(Classification::Offensive));
        let mut runtime = SessionRuntime::new(MemoryStore::new(), api);
        let mut out = Vec::new();

        run_say(&mut runtime, &args("you are awful"), &mut out)
            .await
            .expect("say");

        let printed = String::from_utf8(out).expect("utf8");
        assert_eq!(
            printed,
            "Bot: [offensive] Please keep it civil.\nclassification: offensive\n"
        );
        assert_eq!(runtime.api().requests()[0].message, "you are awful");
        assert_eq!(store::load_history(runtime.store()).len(), 2);
    }

    #[tokio::test]
    async fn appends_to_existing_history() {
        let mut seeded = MemoryStore::new();
        store::save_history(&mut seeded, &[Message::user("earlier")]).expect("seed");
        let api = ScriptedApi::new().reply("Hi", None);
        let mut runtime = SessionRuntime::new(seeded, api);

        run_say(&mut runtime, &args("hello"), &mut Vec::new())
            .await
            .expect("say");

        let history = store::load_history(runtime.store());
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["earlier", "hello", "Hi"]);
    }

    #[tokio::test]
    async fn service_failure_prints_fallback_and_errors() {
        let api = ScriptedApi::new().push(ScriptedReply::Status(503));
        let mut runtime = SessionRuntime::new(MemoryStore::new(), api);
        let mut out = Vec::new();

        let result = run_say(&mut runtime, &args("hello"), &mut out).await;

        assert!(result.is_err());
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains(FALLBACK_REPLY));
        assert!(printed.contains("classification: irrelevant"));
    }

    #[tokio::test]
    async fn service_failure_with_unwritable_store_still_errors() {
        let api = ScriptedApi::new().push(ScriptedReply::Status(503));
        let mut runtime = SessionRuntime::new(FailingStore::default(), api);
        let mut out = Vec::new();

        let result = run_say(&mut runtime, &args("hello"), &mut out).await;

        assert!(matches!(
            runtime.session().status(),
            Status::StorageError(_)
        ));
        assert!(result.is_err());
        assert!(String::from_utf8(out).expect("utf8").contains(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn confidence_is_printed_when_reported() {
        let api = ScriptedApi::new().push(ScriptedReply::Reply(ChatResponse {
            reply: "Happy to help.".into(),
            classification: Classification::Safe,
            confidence: Some(0.934),
        }));
        let mut runtime = SessionRuntime::new(MemoryStore::new(), api);
        let mut out = Vec::new();

        run_say(&mut runtime, &args("hi"), &mut out)
            .await
            .expect("say");

        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Bot: Happy to help.\nclassification: safe (confidence 0.93)\n"
        );
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected_without_a_request() {
        let mut runtime = SessionRuntime::new(MemoryStore::new(), ScriptedApi::new());
        let result = run_say(&mut runtime, &args("   "), &mut Vec::new()).await;
        assert!(result.is_err());
        assert!(runtime.api().requests().is_empty());
    }

    #[tokio::test]
    async fn unsaved_reply_is_still_printed() {
        let api = ScriptedApi::new().reply("Hi", None);
        let mut runtime = SessionRuntime::new(FailingStore::default(), api);
        let mut out = Vec::new();

        run_say(&mut runtime, &args("hello"), &mut out)
            .await
            .expect("say");
        assert!(String::from_utf8(out).expect("utf8").starts_with("Bot: Hi"));
    }
}
