/// BCH CashToken SDK - Script building and cash address handling.
///
/// Provides the Bitcoin Cash Script type, opcode definitions, the cashaddr
/// address codec (P2PKH and P2SH, all three network prefixes), and
/// OP_RETURN data-carrier construction.

pub mod cashaddr;
pub mod op_return;
pub mod opcodes;
pub mod script;

mod error;
pub use cashaddr::{Address, AddressKind, Network};
pub use error::ScriptError;
pub use op_return::PushdataItem;
pub use script::Script;
