pub mod aggregator;
pub mod coc_client;
pub mod coc_model;
pub mod war_fetcher;
pub mod war_summarizer;

#[cfg(test)]
pub mod mock_api;
