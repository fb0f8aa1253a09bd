pub mod email_link_handlers;
pub mod page_handlers;
pub mod register_handlers;

pub use email_link_handlers::{show_email_link_form, submit_email_link_form};
pub use page_handlers::{
    email_link_callback_handler, health_handler, index_handler, not_found_handler,
};
pub use register_handlers::{show_register_form, submit_register_form};
