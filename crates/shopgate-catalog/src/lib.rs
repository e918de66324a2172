pub mod mode;
pub mod normalize;
pub mod pdp;
pub mod types;
pub mod variants;

pub use mode::{detect_mode, ModeSignals, ProductMode};
pub use normalize::{normalize_product, normalize_products, normalize_variants, products_from_value};
pub use pdp::{build_pdp_view, PdpView};
pub use types::{RawDeal, RawProduct, RawVariant};
pub use variants::{resolve_selection, Resolution, Selection};
