//! Public view analytics: device and referrer classification, event
//! recording, and the aggregate shapes served by the stats endpoints.

pub mod device;
pub mod models;
pub mod recorder;
pub mod referrer;

pub use device::classify_device;
pub use models::{DailyViews, DayCount, DeviceClass, DimensionCount, NewViewEvent, ViewEvent};
pub use recorder::{record_view, RequestContext};
pub use referrer::classify_referrer;
