pub mod http;

pub use http::{
    decode_json, ApiClient, HttpMethod, MockApiClient, MockReply, QueryPairs, RecordedCall,
    ReqwestApiClient,
};
