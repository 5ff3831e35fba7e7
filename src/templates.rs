//! Page templates for the browser UI.
//!
//! Templates are embedded at compile time from the `templates/` directory.

use crate::agent::Profile;

/// Single-page UI shell with `{{...}}` placeholders
pub const INDEX: &str = include_str!("../templates/index.html");

const RESEARCH_SIDEBAR: &str = r#"<h2>Instructions</h2>
<p>Enter a question below. The AI will analyze your request and determine the best approach
to process and retrieve relevant information efficiently.</p>
<h3>Execution Flow</h3>
<p>Each question goes to the model. When the model asks for a web search, the search runs
and its results go back to the model. This repeats until the model answers.</p>"#;

const NETWORK_SIDEBAR: &str = r#"<h2>About This App</h2>
<p>This app allows network engineers to interact with network devices, run show commands,
and analyze logs for troubleshooting purposes. You can enter your queries, commands or logs
and get real-time insights and action suggestions from the AI.</p>
<h2>Quick Commands</h2>
<ul>
  <li><b>What is the software version on this device?</b>: Retrieve the SW-version from the device.</li>
  <li><b>Analyze logs</b>: Paste logs to identify any errors or warnings.</li>
  <li><b>Troubleshoot interfaces</b>: Check the interface status using commands like <code>show ip interface brief</code>.</li>
</ul>"#;

/// Render the UI page for a profile
pub fn render_page(profile: Profile) -> String {
    let (intro, label, button, sidebar) = match profile {
        Profile::Research => (
            "Ask a question and the assistant will search the web when it needs to.",
            "Enter your question:",
            "Get Answer",
            RESEARCH_SIDEBAR,
        ),
        Profile::Network => (
            "Enter your query below and get real-time insights from your network device.",
            "Enter your query or commands or logs to be analysed:",
            "Submit",
            NETWORK_SIDEBAR,
        ),
    };

    INDEX
        .replace("{{title}}", profile.title())
        .replace("{{intro}}", intro)
        .replace("{{label}}", label)
        .replace("{{button}}", button)
        .replace("{{sidebar}}", sidebar)
}
