//! Ticket lifecycle: sequencing, line operations, settlement, splits

mod manager;
mod sequence;

pub use manager::TicketManager;
pub(crate) use manager::ticket_totals;
pub use sequence::{next_ticket_id, next_ticket_id_on};
