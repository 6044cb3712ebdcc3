mod firecrawl_client;
mod mock_scraper;

pub use firecrawl_client::FirecrawlClient;
pub use mock_scraper::MockScraper;
