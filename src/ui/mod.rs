/// UI components rendered with Yew
pub mod banner;
