pub mod panel;
pub mod turn;

pub use panel::{ ChatPanel, PanelElement };
pub use turn::{ TurnController, TurnOutcome };
