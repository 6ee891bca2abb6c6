pub mod response_composer;
