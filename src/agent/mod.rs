pub mod intent;
pub mod keywords;
pub mod prompts;
pub mod session;

pub use intent::{AgentIntent, IntentAction, IntentOutcome, SearchParams};
pub use session::{Message, Role, Session, TurnOutcome};
