pub mod ttl_cache;
