pub mod display;
pub mod feedback;

pub use display::{
    cards_handler, display_config_handler, floating_handler, health_handler, stats_handler,
    tree_handler,
};
pub use feedback::{list_feedback_handler, submit_feedback_handler};
