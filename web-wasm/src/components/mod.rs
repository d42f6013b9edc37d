pub mod header;
pub mod footer;
pub mod url_input_form;
pub mod example_urls;
pub mod loading_indicator;
pub mod result_display;
