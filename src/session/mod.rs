pub mod lesson_page;
pub mod quiz_page;
pub mod request;
