pub mod config;
pub mod messages;
pub mod shared_str;

pub use config::LayoutConfig;
pub use messages::{
    CalculateLayout, CombinedLayoutResult, CombinedPlacement, EventInput, LayoutRequest,
    LayoutResponse, ProtocolError, RequestId, SwimlaneLayoutResult, SwimlanePlacement,
    SwimlaneRow, decode_request, decode_request_with_defaults, encode_response,
};
pub use shared_str::SharedStr;
