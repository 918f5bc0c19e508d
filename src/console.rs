use fsm::{ActorId, InboundEvent, UserProfile};
use kindbox_dialog::errors::Result;
use kindbox_dialog::{ChoiceSet, OutboundMessage, Transport};
use std::io::{self, Write};

/// Actor usado cuando la línea no empieza con `@<id>`.
pub const DEFAULT_ACTOR: ActorId = 1;

/// Transporte de consola: imprime cada mensaje y su teclado en stdout.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn send(&self, actor_id: ActorId, message: OutboundMessage) -> Result<()> {
        let mut out = io::stdout().lock();
        let rendered = render(actor_id, &message);
        out.write_all(rendered.as_bytes())
           .and_then(|_| out.flush())
           .map_err(|e| kindbox_dialog::BotError::Transport(e.to_string()))
    }

    fn fetch_user_profile(&self, actor_id: ActorId) -> Result<UserProfile> {
        Ok(UserProfile::new("Гость", format!("#{}", actor_id)))
    }
}

fn render(actor_id: ActorId, message: &OutboundMessage) -> String {
    let mut s = format!("\n[bot -> {}] {}\n", actor_id, message.text);
    match &message.choices {
        Some(set) if set.is_empty() => s.push_str("  (teclado oculto)\n"),
        Some(set) => s.push_str(&render_choices(set)),
        None => {}
    }
    s
}

fn render_choices(set: &ChoiceSet) -> String {
    set.rows
       .iter()
       .map(|row| format!("  [ {} ]\n", row.join(" | ")))
       .collect()
}

/// Interpreta `@<actor_id> <texto>`; sin prefijo `@` toda la línea es texto
/// del actor por defecto, aunque empiece con dígitos (un teléfono escrito
/// con espacios). Las líneas vacías se ignoran.
pub fn parse_line(line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(addressed) = line.strip_prefix('@') {
        let (head, rest) = addressed.split_once(char::is_whitespace).unwrap_or((addressed, ""));
        if let Ok(actor_id) = head.parse::<ActorId>() {
            return Some(InboundEvent::text(actor_id, rest.trim()));
        }
    }
    Some(InboundEvent::text(DEFAULT_ACTOR, line))
}
