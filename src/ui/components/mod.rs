pub mod course_dashboard;
pub mod level_detail;
pub mod lesson_view;
pub mod popup;
pub mod progress_bar;
pub mod quiz_view;
