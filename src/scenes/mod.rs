//! The scenes of the computability video, in playing order.

mod church_turing;
mod computer_pile;
mod functions;
mod mathematicians;
mod quote;

pub use church_turing::ChurchAndTuring;
pub use computer_pile::ComputerPile;
pub use functions::Functions;
pub use mathematicians::Mathematicians;
pub use quote::Quote;
