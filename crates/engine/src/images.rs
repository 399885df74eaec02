//! Deterministic stock-image selection per niche.
//!
//! One selector, one set of tables. Selection is a pure cyclic slice of a
//! static per-niche URL list, so the same (niche, index) pair always yields
//! the same images. Validation checks a URL's host against a small
//! trusted-CDN allow-list; anything else is substituted with a known-good
//! URL before upload.

use storeforge_core::Niche;
use tracing::warn;

/// Hosts Shopify is allowed to fetch product images from.
const ALLOWED_IMAGE_HOSTS: &[&str] = &[
    "images.unsplash.com",
    "images.pexels.com",
    "cdn.pixabay.com",
    "cdn.shopify.com",
];

const PETS_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1548199973-03cce0bbc87b?w=800&q=80",
    "https://images.unsplash.com/photo-1543466835-00a7907e9de1?w=800&q=80",
    "https://images.unsplash.com/photo-1425082661705-1834bfd09dca?w=800&q=80",
    "https://images.unsplash.com/photo-1583511655857-d19b40a7a54e?w=800&q=80",
    "https://images.unsplash.com/photo-1517849845537-4d257902454a?w=800&q=80",
    "https://images.unsplash.com/photo-1574158622682-e40e69881006?w=800&q=80",
    "https://images.unsplash.com/photo-1415369629372-26f2fe60c467?w=800&q=80",
    "https://images.unsplash.com/photo-1450778869180-41d0601e046e?w=800&q=80",
    "https://images.unsplash.com/photo-1548767797-d8c844163c4c?w=800&q=80",
    "https://images.unsplash.com/photo-1537151608828-ea2b11777ee8?w=800&q=80",
];

const BEAUTY_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1596462502278-27bfdc403348?w=800&q=80",
    "https://images.unsplash.com/photo-1571781926291-c477ebfd024b?w=800&q=80",
    "https://images.unsplash.com/photo-1522335789203-aabd1fc54bc9?w=800&q=80",
    "https://images.unsplash.com/photo-1512496015851-a90fb38ba796?w=800&q=80",
    "https://images.unsplash.com/photo-1556228720-195a672e8a03?w=800&q=80",
    "https://images.unsplash.com/photo-1570172619644-dfd03ed5d881?w=800&q=80",
    "https://images.unsplash.com/photo-1598440947619-2c35fc9aa908?w=800&q=80",
    "https://images.unsplash.com/photo-1631729371254-42c2892f0e6e?w=800&q=80",
    "https://images.unsplash.com/photo-1620916566398-39f1143ab7be?w=800&q=80",
];

const FITNESS_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=800&q=80",
    "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=800&q=80",
    "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=800&q=80",
    "https://images.unsplash.com/photo-1540497077202-7c8a3999166f?w=800&q=80",
    "https://images.unsplash.com/photo-1583454110551-21f2fa2afe61?w=800&q=80",
    "https://images.unsplash.com/photo-1599058917212-d750089bc07e?w=800&q=80",
    "https://images.unsplash.com/photo-1594737625785-a6cbdabd40c5?w=800&q=80",
    "https://images.unsplash.com/photo-1576678927484-cc907957088c?w=800&q=80",
    "https://images.unsplash.com/photo-1518611012118-696072aa579a?w=800&q=80",
];

const TECH_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1468495244123-6c6c332eeece?w=800&q=80",
    "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=800&q=80",
    "https://images.unsplash.com/photo-1526738549149-8e07eca6c147?w=800&q=80",
    "https://images.unsplash.com/photo-1546868871-7041f2a55e12?w=800&q=80",
    "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&q=80",
    "https://images.unsplash.com/photo-1572569511254-d8f925fe2cbb?w=800&q=80",
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&q=80",
    "https://images.unsplash.com/photo-1593642632823-8f785ba67e45?w=800&q=80",
];

const HOME_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1556911220-bff31c812dba?w=800&q=80",
    "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=800&q=80",
    "https://images.unsplash.com/photo-1513694203232-719a280e022f?w=800&q=80",
    "https://images.unsplash.com/photo-1524758631624-e2822e304c36?w=800&q=80",
    "https://images.unsplash.com/photo-1538688525198-9b88f6f53126?w=800&q=80",
    "https://images.unsplash.com/photo-1567538096630-e0c55bd6374c?w=800&q=80",
    "https://images.unsplash.com/photo-1583847268964-b28dc8f51f92?w=800&q=80",
    "https://images.unsplash.com/photo-1616486338812-3dadae4b4ace?w=800&q=80",
];

const FASHION_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1445205170230-053b83016050?w=800&q=80",
    "https://images.unsplash.com/photo-1483985988355-763728e1935b?w=800&q=80",
    "https://images.unsplash.com/photo-1434389677669-e08b4cac3105?w=800&q=80",
    "https://images.unsplash.com/photo-1441986300917-64674bd600d8?w=800&q=80",
    "https://images.unsplash.com/photo-1469334031218-e382a71b716b?w=800&q=80",
    "https://images.unsplash.com/photo-1496747611176-843222e1e57c?w=800&q=80",
    "https://images.unsplash.com/photo-1485968579580-b6d095142e6e?w=800&q=80",
    "https://images.unsplash.com/photo-1529139574466-a303027c1d8b?w=800&q=80",
];

/// Generic table for unrecognized niches.
const UNIVERSAL_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=800&q=80",
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=800&q=80",
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=800&q=80",
    "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=800&q=80",
    "https://images.unsplash.com/photo-1441986300917-64674bd600d8?w=800&q=80",
    "https://images.unsplash.com/photo-1472851294608-062f824d29cc?w=800&q=80",
    "https://images.unsplash.com/photo-1498049794561-7780e7231661?w=800&q=80",
    "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=800&q=80",
];

/// Last-resort image attached when every upload for a product failed.
pub const EMERGENCY_IMAGE_URL: &str = UNIVERSAL_IMAGES[0];

/// A value that may have been substituted by a fallback.
///
/// Callers can tell real input apart from degraded-but-usable input without
/// a side-channel boolean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sourced<T> {
    /// The original value passed validation.
    Primary(T),
    /// The original value was rejected and replaced.
    Fallback(T),
}

impl<T> Sourced<T> {
    /// Unwrap to the usable value either way.
    pub fn into_inner(self) -> T {
        match self {
            Self::Primary(value) | Self::Fallback(value) => value,
        }
    }

    /// True when a fallback was substituted.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Look up the image table for a niche.
///
/// Unknown niches fall back to the universal table through an explicit,
/// logged branch.
fn table_for(niche: &Niche) -> &'static [&'static str] {
    match niche.as_str() {
        "pets" => PETS_IMAGES,
        "beauty" => BEAUTY_IMAGES,
        "fitness" => FITNESS_IMAGES,
        "tech" => TECH_IMAGES,
        "home" => HOME_IMAGES,
        "fashion" => FASHION_IMAGES,
        other => {
            warn!(niche = other, "no image table for niche, using universal images");
            UNIVERSAL_IMAGES
        }
    }
}

/// Select `count` image URLs for a product.
///
/// Deterministic: the start offset is `(product_index * 2) % table_len` and
/// the table is cycled, so the result always has exactly `count` entries and
/// repeated calls with equal arguments are identical.
#[must_use]
pub fn select_images(niche: &Niche, product_index: usize, count: usize) -> Vec<String> {
    let table = table_for(niche);
    let offset = (product_index * 2) % table.len();

    table
        .iter()
        .cycle()
        .skip(offset)
        .take(count)
        .map(|url| (*url).to_string())
        .collect()
}

/// Check a URL's host against the trusted-CDN allow-list.
#[must_use]
pub fn is_allowed_image_url(image_url: &str) -> bool {
    url::Url::parse(image_url).is_ok_and(|parsed| {
        parsed.scheme() == "https"
            && parsed
                .host_str()
                .is_some_and(|host| ALLOWED_IMAGE_HOSTS.contains(&host))
    })
}

/// Validate an image URL, substituting a known-good one when it fails.
///
/// The substitute cycles the niche's own table so a bad URL still gets an
/// on-theme replacement.
#[must_use]
pub fn validate_image_url(niche: &Niche, image_url: &str, position: usize) -> Sourced<String> {
    if is_allowed_image_url(image_url) {
        Sourced::Primary(image_url.to_string())
    } else {
        let table = table_for(niche);
        let substitute = table
            .get(position % table.len())
            .copied()
            .unwrap_or(EMERGENCY_IMAGE_URL)
            .to_string();
        warn!(
            rejected = image_url,
            substitute = %substitute,
            "image host not in allow-list, substituting fallback"
        );
        Sourced::Fallback(substitute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_images_returns_exact_count() {
        let niche = Niche::new("pets");
        let images = select_images(&niche, 0, 8);
        assert_eq!(images.len(), 8);
    }

    #[test]
    fn test_select_images_is_deterministic() {
        let niche = Niche::new("beauty");
        assert_eq!(select_images(&niche, 3, 8), select_images(&niche, 3, 8));
    }

    #[test]
    fn test_select_images_starts_at_doubled_offset() {
        let niche = Niche::new("pets");
        let images = select_images(&niche, 1, 2);
        assert_eq!(images[0], PETS_IMAGES[2]);
        assert_eq!(images[1], PETS_IMAGES[3]);
    }

    #[test]
    fn test_select_images_index_zero_starts_at_table_head() {
        let niche = Niche::new("pets");
        let images = select_images(&niche, 0, 8);
        assert_eq!(images[0], PETS_IMAGES[0]);
    }

    #[test]
    fn test_select_images_cycles_past_table_end() {
        let niche = Niche::new("tech"); // 8-entry table
        let images = select_images(&niche, 3, 8);
        assert_eq!(images.len(), 8);
        assert_eq!(images[0], TECH_IMAGES[6]);
        assert_eq!(images[2], TECH_IMAGES[0]);
    }

    #[test]
    fn test_unknown_niche_uses_universal_table() {
        let niche = Niche::new("submarine-parts");
        let images = select_images(&niche, 0, 4);
        assert_eq!(images[0], UNIVERSAL_IMAGES[0]);
    }

    #[test]
    fn test_all_table_urls_pass_validation() {
        for table in [
            PETS_IMAGES,
            BEAUTY_IMAGES,
            FITNESS_IMAGES,
            TECH_IMAGES,
            HOME_IMAGES,
            FASHION_IMAGES,
            UNIVERSAL_IMAGES,
        ] {
            for image_url in table {
                assert!(is_allowed_image_url(image_url), "{image_url} must be allow-listed");
            }
        }
    }

    #[test]
    fn test_validate_rejects_untrusted_host() {
        let niche = Niche::new("pets");
        let result = validate_image_url(&niche, "https://evil.example.com/cat.jpg", 0);
        assert!(result.is_fallback());
        assert!(is_allowed_image_url(&result.into_inner()));
    }

    #[test]
    fn test_validate_rejects_plain_http() {
        let niche = Niche::new("pets");
        let result = validate_image_url(&niche, "http://images.unsplash.com/photo.jpg", 0);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_validate_passes_trusted_url_through() {
        let niche = Niche::new("pets");
        let result = validate_image_url(&niche, PETS_IMAGES[4], 4);
        assert_eq!(result, Sourced::Primary(PETS_IMAGES[4].to_string()));
    }

    #[test]
    fn test_emergency_image_is_allow_listed() {
        assert!(is_allowed_image_url(EMERGENCY_IMAGE_URL));
    }
}
