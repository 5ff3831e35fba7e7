//! CLI adapter: single-message and interactive command line interface.
//!
//! Every line is an independent submission; nothing carries over between
//! lines.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::Channel;
use crate::agent::{AgentLoop, Profile};
use crate::ui;
use crate::Result;

/// CLI channel for agent sessions.
pub struct CliChannel {
    agent: AgentLoop,
    profile: Profile,
    stopped: Arc<AtomicBool>,
}

impl CliChannel {
    /// Create a new CLI channel.
    pub fn new(agent: AgentLoop, profile: Profile) -> Self {
        Self {
            agent,
            profile,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run a single message and return the answer.
    ///
    /// Tool notices are printed while the run is in progress.
    pub async fn run_once(&self, message: &str) -> Result<String> {
        let spinner = ui::Spinner::start("Processing...");
        let result = self.agent.ask(message, Some(&spinner)).await;
        spinner.finish();
        Ok(result?.answer)
    }

    /// Run the interactive loop over stdin.
    pub async fn run_interactive(&self) -> Result<()> {
        ui::print_header(self.profile.title(), self.agent.model(), self.profile.name());
        println!("  Type a question, paste logs, or 'exit' to quit.");
        self.run_lines(BufReader::new(tokio::io::stdin())).await
    }

    /// Process submissions read line by line from `input` until EOF or exit.
    pub async fn run_lines<R: AsyncBufRead + Unpin>(&self, mut input: R) -> Result<()> {
        let mut stdout = io::stdout();

        while !self.stopped.load(Ordering::SeqCst) {
            print!("\n{}: ", "You".blue().bold());
            stdout.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).await? == 0 {
                // EOF
                break;
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if matches!(text.to_lowercase().as_str(), "exit" | "quit" | "q") {
                println!("Goodbye! 👋");
                break;
            }

            match self.run_once(text).await {
                Ok(answer) => println!("\n{}: {}", "Agent".green().bold(), answer),
                Err(e) => ui::print_error(&format!("Error: {e}")),
            }
        }

        Ok(())
    }
}

impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    fn start(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            self.stopped.store(false, Ordering::SeqCst);
            self.run_interactive().await
        }
    }

    fn stop(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        let stopped = self.stopped.clone();
        async move {
            stopped.store(true, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::FakeLlmClient;
    use crate::agent::LoopOptions;
    use crate::tools::ToolRegistry;
    use std::io::Cursor;

    fn channel(client: &Arc<FakeLlmClient>) -> CliChannel {
        let agent = AgentLoop::new(client.clone(), Arc::new(ToolRegistry::empty()), LoopOptions::default());
        CliChannel::new(agent, Profile::Research)
    }

    #[tokio::test]
    async fn test_run_once() {
        let client = Arc::new(FakeLlmClient::new(vec!["Hello, engineer!"]));
        let answer = channel(&client).run_once("Hi there").await.unwrap();
        assert_eq!(answer, "Hello, engineer!");
    }

    #[tokio::test]
    async fn test_lines_are_independent_submissions() {
        let client = Arc::new(FakeLlmClient::new(vec!["one", "two"]));
        let cli = channel(&client);

        cli.run_lines(Cursor::new("first\n\n   \nsecond\nexit\nnever sent\n")).await.unwrap();

        assert_eq!(client.call_count(), 2);
        assert_eq!(client.received(1), vec![crate::agent::Message::user("second")]);
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_session() {
        // no scripted responses: every model call fails
        let client = Arc::new(FakeLlmClient::new(vec![]));
        let cli = channel(&client);

        cli.run_lines(Cursor::new("a\nb\n")).await.unwrap();
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_lines_are_read_without_blocking_the_runtime() {
        let client = Arc::new(FakeLlmClient::new(vec!["pong"]));
        let cli = channel(&client);
        let (mut writer, reader) = tokio::io::duplex(64);

        // the session waits on input while the writer task still gets to run
        let writer_task = tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            writer.write_all(b"ping\nexit\n").await.unwrap();
        });
        cli.run_lines(BufReader::new(reader)).await.unwrap();
        writer_task.await.unwrap();

        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_prevents_further_reads() {
        let client = Arc::new(FakeLlmClient::new(vec!["unused"]));
        let cli = channel(&client);

        cli.stop().await.unwrap();
        cli.run_lines(Cursor::new("question\n")).await.unwrap();
        assert_eq!(client.call_count(), 0);
    }
}
