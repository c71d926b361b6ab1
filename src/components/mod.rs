pub mod city_details;
pub mod city_form;
pub mod city_list;
pub mod page_nav;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use city_details::{CityDetails, CityDetailsProps};
pub use city_form::{CityFormOverlay, CityFormProps};
pub use city_list::{CityList, CityListProps};
pub use page_nav::{PageNav, NAV_LINKS};
