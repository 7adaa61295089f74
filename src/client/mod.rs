pub mod amadeus;
pub mod traits;

pub use amadeus::AmadeusClient;
pub use traits::HotelApi;
