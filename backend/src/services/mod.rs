pub mod cache;
pub mod coordinator;
pub mod metadata_client;
pub mod readability;
pub mod word_frequency;
pub mod youtube_client;

#[cfg(test)]
pub(crate) mod test_support;
