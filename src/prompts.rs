//! Default prompt and canned chatbot replies

/// Built-in system instruction for the support chatbot, used until the
/// operator saves their own.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = r#"
Sei "Alex", il Senior App Consultant di "Fare App", l'agenzia web d'élite specializzata nello sviluppo di applicazioni mobili Native per iOS e Android.
Rispondi sempre in Italiano.
"#;

/// Shown to site visitors when no chat API key is configured
pub const CHAT_MAINTENANCE_REPLY: &str = "Servizio AI in manutenzione. Scrivi a info@fareapp.it";

/// Shown when the chat endpoint could not be reached or returned an error
pub const CHAT_CONNECTION_REPLY: &str = "Spiacente, ho un problema di connessione.";

/// Shown when the chat endpoint answered without any text
pub const CHAT_EMPTY_REPLY: &str = "Spiacente, riprova più tardi.";

/// Message sent by the connection check
pub const CHAT_PROBE_MESSAGE: &str = "Test connessione.";
