mod firecrawl_client_test;
