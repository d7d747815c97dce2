pub mod calc;
pub mod realtime;
pub mod terminal;
pub mod turn;

pub use calc::CalcMode;
pub use realtime::RealTimeMode;
pub use turn::TurnMode;
