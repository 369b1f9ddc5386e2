//! CLI (Command Line Interface) mode
//!
//! Interactive REPL on top of the chat controller. Plain lines are sent to
//! the assistant; lines starting with `/` are commands. Tab completes both
//! commands and the suggestion phrases of the selected language.

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Span, Suggestion,
};
use std::borrow::Cow;
use std::sync::{Arc, RwLock};
use tracing::info;
use unichat_core::export;
use unichat_core::session::{Message, MessageKind};
use unichat_core::{ChatController, Config, Language, SendOutcome, suggestions};

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show help"),
    ("/new", "Start a new chat session"),
    ("/sessions", "List chat sessions"),
    ("/switch", "Switch session: /switch <n>"),
    ("/delete", "Delete session: /delete <n>"),
    ("/rename", "Rename current session: /rename <name>"),
    ("/lang", "Select language: /lang <en|tr|ar|fr|ur|fa>"),
    ("/context", "Show what the assistant remembers"),
    ("/rate", "Rate a reply: /rate <n> <1-5>"),
    ("/history", "Show conversation history"),
    ("/export", "Export conversation to a text file"),
    ("/status", "Show backend connection status"),
    ("/exit", "Quit"),
];

/// Selected language shared between the REPL loop and the completer
type SharedLanguage = Arc<RwLock<Language>>;

/// Completer for commands and suggestion phrases
#[derive(Clone)]
pub struct ChatCompleter {
    language: SharedLanguage,
}

impl ChatCompleter {
    pub fn new(language: SharedLanguage) -> Self {
        Self { language }
    }

    fn language(&self) -> Language {
        self.language.read().map(|l| *l).unwrap_or_default()
    }
}

impl Completer for ChatCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let span = Span::new(0, pos);

        if line.starts_with('/') {
            return COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(line))
                .map(|(cmd, desc)| Suggestion {
                    value: cmd.to_string(),
                    description: Some(desc.to_string()),
                    span,
                    append_whitespace: true,
                    ..Default::default()
                })
                .collect();
        }

        suggestions(line, self.language())
            .into_iter()
            .map(|phrase| Suggestion {
                value: phrase.to_string(),
                span,
                ..Default::default()
            })
            .collect()
    }
}

/// Custom prompt showing the selected language
struct ChatPrompt {
    style: Style,
    language: SharedLanguage,
}

impl ChatPrompt {
    fn new(language: SharedLanguage) -> Self {
        Self {
            style: Color::Cyan.bold(),
            language,
        }
    }
}

impl Prompt for ChatPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let code = self.language.read().map(|l| l.code()).unwrap_or("en");
        Cow::Owned(self.style.paint(format!("[{}] > ", code)).to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// What the REPL should do after a command
#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    /// Command handled, keep reading
    Handled,
    /// Leave the REPL
    Exit,
    /// Not a command; send as a chat message
    NotCommand,
}

/// Run CLI interactive mode
pub async fn run_cli(controller: ChatController, config: &Config) -> anyhow::Result<()> {
    let language: SharedLanguage = Arc::new(RwLock::new(controller.read(|s| s.language()).await));

    info!("Starting interactive chat");
    print_welcome();
    print_messages(&controller.read(|s| s.active_messages().to_vec()).await);

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion_menu")
            .with_columns(1)
            .with_column_width(Some(60))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(ChatCompleter::new(Arc::clone(&language))))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(default_keybindings())));

    let prompt = ChatPrompt::new(Arc::clone(&language));

    loop {
        let signal = line_editor.read_line(&prompt);

        match signal {
            Ok(Signal::Success(line)) => {
                let input = line.trim();

                if input.is_empty() {
                    continue;
                }

                match handle_command(input, &controller, config, &language).await {
                    CommandOutcome::Handled => continue,
                    CommandOutcome::Exit => break,
                    CommandOutcome::NotCommand => {}
                }

                send_message(&controller, input).await;
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => break,
            Err(err) => {
                eprintln!("\n❌ Error: {}\n", err);
                break;
            }
        }
    }

    println!("\n👋 Goodbye!\n");
    Ok(())
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    // Tab key triggers completion
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    // Esc key clears/closes menus
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

/// Send one message and print the reply
async fn send_message(controller: &ChatController, input: &str) {
    println!("{}", Style::new().dimmed().paint("AI is typing..."));

    match controller.send(input).await {
        SendOutcome::Sent(pending) => {
            let reply = controller
                .read(|s| {
                    s.get(&pending.session_id)
                        .and_then(|session| session.messages.last().cloned())
                })
                .await;
            if let Some(message) = reply.filter(|m| m.is_bot()) {
                print_bot(&message);
            }
        }
        SendOutcome::Busy => {
            eprintln!("\n⏳ Still waiting for the previous reply.\n");
        }
        SendOutcome::Ignored => {}
    }
}

/// Handle special commands
async fn handle_command(
    input: &str,
    controller: &ChatController,
    config: &Config,
    language: &SharedLanguage,
) -> CommandOutcome {
    if !input.starts_with('/') {
        return CommandOutcome::NotCommand;
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command.as_str() {
        "/exit" | "/quit" | "/q" => return CommandOutcome::Exit,
        "/help" | "/?" => print_help(),
        "/new" => {
            controller.new_chat().await;
            println!("\n✅ Started a new chat.\n");
            print_messages(&controller.read(|s| s.active_messages().to_vec()).await);
        }
        "/sessions" => print_sessions(controller).await,
        "/switch" => match session_id_at(controller, arg).await {
            Some(id) => match controller.switch_session(&id).await {
                Ok(()) => print_messages(&controller.read(|s| s.active_messages().to_vec()).await),
                Err(e) => eprintln!("\n❌ {}\n", e),
            },
            None => eprintln!("\n❓ Usage: /switch <n> (see /sessions)\n"),
        },
        "/delete" => match session_id_at(controller, arg).await {
            Some(id) => match controller.delete_session(&id).await {
                Ok(()) => println!("\n🗑️ Session deleted.\n"),
                Err(e) => eprintln!("\n❌ {}\n", e),
            },
            None => eprintln!("\n❓ Usage: /delete <n> (see /sessions)\n"),
        },
        "/rename" => {
            if arg.is_empty() {
                eprintln!("\n❓ Usage: /rename <name>\n");
            } else {
                if let Err(e) = controller.rename_active(arg).await {
                    eprintln!("\n❌ {}\n", e);
                }
            }
        }
        "/lang" => {
            if arg.is_empty() {
                println!();
                for lang in Language::ALL {
                    println!("  {}", lang);
                }
                println!();
            } else {
                let selected = Language::from_code(arg);
                controller.set_language(selected).await;
                if let Ok(mut current) = language.write() {
                    *current = selected;
                }
                println!("\n🌐 Language: {}\n", selected);
            }
        }
        "/context" => {
            let context = controller.read(|s| s.active_context().clone()).await;
            println!();
            if context.is_empty() {
                println!("🧠 Nothing remembered yet.");
            } else {
                println!("🧠 Remembered:");
                for (key, value) in &context {
                    println!("  {}: {}", key, value);
                }
            }
            println!();
        }
        "/rate" => rate(controller, arg).await,
        "/history" => print_history(controller).await,
        "/export" => {
            let messages = controller.read(|s| s.active_messages().to_vec()).await;
            let today = chrono::Local::now().date_naive();
            match export::write_transcript(&config.chat.export_dir, &messages, today) {
                Ok(path) => println!("\n💾 Exported to {}\n", path.display()),
                Err(e) => eprintln!("\n❌ Export failed: {}\n", e),
            }
        }
        "/status" => {
            println!("\n📡 {}\n", controller.connectivity().state().label());
        }
        _ => {
            eprintln!("\n❓ Unknown command: {}. Type /help for the list.\n", input);
        }
    }

    CommandOutcome::Handled
}

/// Resolve a 1-based session number to its id
async fn session_id_at(controller: &ChatController, arg: &str) -> Option<String> {
    let index = arg.parse::<usize>().ok()?.checked_sub(1)?;
    controller
        .read(|s| s.sessions().get(index).map(|session| session.id.clone()))
        .await
}

/// `/rate <n> <1-5>` where n is the message number from /history
async fn rate(controller: &ChatController, arg: &str) {
    let mut parts = arg.split_whitespace();
    let parsed = (
        parts.next().and_then(|n| n.parse::<usize>().ok()),
        parts.next().and_then(|r| r.parse::<u8>().ok()),
    );

    let (Some(number), Some(rating)) = parsed else {
        eprintln!("\n❓ Usage: /rate <n> <1-5> (see /history)\n");
        return;
    };

    let message_id = controller
        .read(|s| {
            number
                .checked_sub(1)
                .and_then(|i| s.active_messages().get(i))
                .map(|m| m.id)
        })
        .await;

    let result = match message_id {
        Some(id) => controller.rate_message(id, rating).await.map_err(|e| e.to_string()),
        None => Err(format!("No message #{}", number)),
    };

    match result {
        Ok(()) => println!("\n⭐ Thanks for the feedback!\n"),
        Err(e) => eprintln!("\n❌ {}\n", e),
    }
}

fn print_bot(message: &Message) {
    println!(
        "\n{} {}\n{}\n",
        Color::Blue.bold().paint("AI"),
        Style::new().dimmed().paint(message.timestamp.as_str()),
        message.content
    );
}

fn print_messages(messages: &[Message]) {
    for message in messages {
        match message.kind {
            MessageKind::Bot => print_bot(message),
            MessageKind::User => println!(
                "{} {}\n{}\n",
                Color::Green.bold().paint("You"),
                Style::new().dimmed().paint(message.timestamp.as_str()),
                message.content
            ),
        }
    }
}

async fn print_sessions(controller: &ChatController) {
    let lines = controller
        .read(|s| {
            s.sessions()
                .iter()
                .enumerate()
                .map(|(i, session)| {
                    let marker = if session.id == s.active_id() { "*" } else { " " };
                    format!(
                        "{} {}. {} ({} messages, last active {})",
                        marker,
                        i + 1,
                        session.name,
                        session.message_count(),
                        session.last_activity.with_timezone(&chrono::Local).format("%H:%M")
                    )
                })
                .collect::<Vec<_>>()
        })
        .await;

    println!();
    println!("💬 Sessions:");
    for line in lines {
        println!("{}", line);
    }
    println!();
}

/// Print welcome message
fn print_welcome() {
    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          🎓 unichat - University Assistant                 ║");
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  Type your message and press Enter                         ║");
    println!("║  Commands: /help, /new, /sessions, /lang, /export, /exit   ║");
    println!("║  Tab shows suggestions and commands                        ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
}

/// Print help message
fn print_help() {
    println!();
    println!("📖 Available commands:");
    for (cmd, desc) in COMMANDS {
        println!("  {} - {}", cmd, desc);
    }
    println!();
    println!("💡 Tip: start typing a question and press Tab for suggestions");
    println!();
}

/// Print conversation history
async fn print_history(controller: &ChatController) {
    let rows = controller
        .read(|s| {
            s.active_messages()
                .iter()
                .map(|m| (m.kind, m.content.clone(), s.rating(m.id)))
                .collect::<Vec<_>>()
        })
        .await;

    println!();
    println!("📜 History ({} messages):", rows.len());
    println!("{}", "─".repeat(50));

    for (i, (kind, content, rating)) in rows.iter().enumerate() {
        let role = match kind {
            MessageKind::User => "👤 You",
            MessageKind::Bot => "🤖 AI",
        };
        let preview: String = if content.chars().count() > 100 {
            format!("{}...", content.chars().take(100).collect::<String>())
        } else {
            content.clone()
        };
        let stars = rating
            .map(|r| format!(" {}", "★".repeat(r as usize)))
            .unwrap_or_default();
        println!("{}. {}: {}{}", i + 1, role, preview.replace('\n', " "), stars);
    }

    println!("{}", "─".repeat(50));
    println!();
}
