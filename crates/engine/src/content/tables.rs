//! Static copy tables keyed by niche.
//!
//! Data, not logic. Every list is indexed with `index % len`, so table
//! lengths only affect rotation, never correctness. Unknown niches are
//! handled by the caller with an explicit fallback to [`GENERIC`].

/// Leading adjective for generated titles.
pub const POWER_WORDS: &[&str] = &[
    "Ultimate",
    "Premium",
    "Revolutionary",
    "Essential",
    "Luxurious",
    "Smart",
    "Pro-Grade",
    "Effortless",
];

/// Scarcity/popularity qualifier for generated titles.
pub const URGENCY_WORDS: &[&str] = &[
    "Must-Have",
    "Best-Selling",
    "Trending",
    "Limited-Edition",
    "Top-Rated",
    "Customer-Favorite",
];

/// Rotating names for synthetic testimonials.
pub const CUSTOMER_NAMES: &[&str] = &[
    "Sarah M.",
    "James K.",
    "Priya R.",
    "Daniel O.",
    "Emma L.",
    "Marcus T.",
    "Olivia H.",
    "Noah B.",
];

/// Copy fragments for one niche.
pub struct NicheContent {
    /// Noun phrases completing the generated titles.
    pub noun_phrases: &'static [&'static str],
    /// Optional emoji prefix for titles.
    pub emoji: &'static str,
    /// Opening emotional hooks.
    pub hooks: &'static [&'static str],
    /// Problem half of the problem/solution paragraph.
    pub problem: &'static str,
    /// Solution half of the problem/solution paragraph.
    pub solution: &'static str,
    /// Selling points rendered as a feature list.
    pub features: &'static [&'static str],
    /// Social-proof blurb.
    pub social_proof: &'static str,
    /// Rotating synthetic testimonials.
    pub testimonials: &'static [&'static str],
}

pub const PETS: NicheContent = NicheContent {
    noun_phrases: &[
        "Pet Comfort Bed",
        "Interactive Treat Puzzle",
        "Grooming Care Kit",
        "No-Pull Walking Harness",
        "Self-Cleaning Slicker Brush",
        "Calming Anxiety Blanket",
        "Slow-Feed Smart Bowl",
        "Travel Water Bottle",
    ],
    emoji: "🐾",
    hooks: &[
        "Your furry friend deserves better than ordinary.",
        "Every tail wag tells you when you got it right.",
        "Happy pets make happy homes.",
    ],
    problem: "Most pet products are built down to a price, wearing out in weeks and leaving your companion uncomfortable.",
    solution: "We engineered this for daily use by real pets, with durable materials your vet would approve of and comfort your pet will actually notice.",
    features: &[
        "Vet-approved, pet-safe materials",
        "Machine washable and built for daily use",
        "Suits all breeds and sizes",
        "Easy to clean in under a minute",
        "Designed with animal behaviorists",
    ],
    social_proof: "Join over 12,000 pet parents who switched and never looked back.",
    testimonials: &[
        "My dog refuses to use anything else now. Worth every penny.",
        "Finally a pet product that survives more than a month!",
        "Our rescue cat went from anxious to calm within days.",
    ],
};

pub const BEAUTY: NicheContent = NicheContent {
    noun_phrases: &[
        "Glow Serum Set",
        "Jade Facial Roller",
        "Silk Sleep Skincare Kit",
        "Vitamin C Brightening Drops",
        "Hydration Boost Mask",
        "Precision Brow Styler",
        "Rose Quartz Gua Sha",
        "Overnight Repair Cream",
    ],
    emoji: "✨",
    hooks: &[
        "Radiant skin isn't luck - it's routine.",
        "The mirror is about to become your favorite place.",
        "Glow like you mean it.",
    ],
    problem: "Drugstore formulas promise everything and deliver a shelf of half-used jars.",
    solution: "This is a focused routine with clinically studied ingredients at effective concentrations - fewer steps, visible results.",
    features: &[
        "Dermatologist tested, cruelty free",
        "Clean ingredients, no parabens or sulfates",
        "Visible results within 14 days",
        "Suitable for sensitive skin",
        "Recyclable, travel-friendly packaging",
    ],
    social_proof: "Loved by 8,500+ customers with a 4.8-star average rating.",
    testimonials: &[
        "My skin has never looked this even. Strangers ask what I use.",
        "Two weeks in and the difference is real.",
        "Replaced my entire ten-step routine with this.",
    ],
};

pub const FITNESS: NicheContent = NicheContent {
    noun_phrases: &[
        "Resistance Band Set",
        "Smart Jump Rope",
        "Recovery Massage Gun",
        "Adjustable Kettlebell",
        "Core Sculpting Wheel",
        "Grip Strength Trainer",
        "Workout Timer Cube",
        "Balance Training Pad",
    ],
    emoji: "💪",
    hooks: &[
        "The best gym is the one you'll actually use.",
        "Strong isn't a look - it's a habit.",
        "Your future self is watching this workout.",
    ],
    problem: "Gym memberships go unused and bulky equipment ends up as a coat rack.",
    solution: "Compact, progressive training gear that lives in your home and scales from first rep to personal record.",
    features: &[
        "Gym-grade materials, home-friendly size",
        "Progressive resistance for every level",
        "Includes guided workout plan",
        "Stores in a drawer, sets up in seconds",
        "Sweat-proof, easy-grip surfaces",
    ],
    social_proof: "Trusted by 15,000+ home athletes and counting.",
    testimonials: &[
        "Cancelled my gym membership after a month with this.",
        "Stupidly convenient. No excuses left.",
        "The progression system keeps me coming back.",
    ],
};

pub const TECH: NicheContent = NicheContent {
    noun_phrases: &[
        "Wireless Charging Station",
        "Noise-Isolating Earbuds",
        "Smart LED Light Strip",
        "Portable Power Bank",
        "Ergonomic Laptop Stand",
        "Bluetooth Key Finder",
        "4K Webcam Pro",
        "USB-C Travel Hub",
    ],
    emoji: "⚡",
    hooks: &[
        "Your setup is only as smart as its weakest gadget.",
        "Technology should disappear into your day, not interrupt it.",
        "Upgrade the small things - feel the difference daily.",
    ],
    problem: "Cheap accessories die young, charge slowly, and clutter your desk with cables.",
    solution: "Thoughtfully engineered hardware with premium components, serious safety certification, and design that earns its desk space.",
    features: &[
        "Premium components, 18-month warranty",
        "Universal compatibility (iOS, Android, USB-C)",
        "Fast-charge and low-power modes",
        "Minimal footprint, cable-free design",
        "Overcharge and temperature protection",
    ],
    social_proof: "Over 20,000 units shipped with a 1.2% return rate.",
    testimonials: &[
        "Feels twice the price. Instant desk upgrade.",
        "Survived a year of travel abuse without a scratch.",
        "The little quality-of-life details add up fast.",
    ],
};

pub const HOME: NicheContent = NicheContent {
    noun_phrases: &[
        "Aromatherapy Diffuser",
        "Linen Throw Collection",
        "Minimalist Wall Shelf Set",
        "Ceramic Pour-Over Set",
        "Cozy Reading Lamp",
        "Woven Storage Baskets",
        "Scented Soy Candle Trio",
        "Bamboo Organizer Tray",
    ],
    emoji: "🏡",
    hooks: &[
        "Home is the one place that should feel exactly right.",
        "Small touches, entirely different room.",
        "Make the space you live in the space you love.",
    ],
    problem: "Mass-produced decor looks fine in photos and flimsy on your shelf.",
    solution: "Natural materials, honest construction, and proportions chosen by people who obsess over rooms for a living.",
    features: &[
        "Natural, sustainably sourced materials",
        "Hand-finished details",
        "Neutral palette that fits any room",
        "Arrives gift-ready in plastic-free packaging",
        "Wipes clean, ages beautifully",
    ],
    social_proof: "Featured in three interior-design newsletters this year.",
    testimonials: &[
        "The quality out of the box genuinely surprised me.",
        "Guests ask where it's from every single time.",
        "Made my rental finally feel like mine.",
    ],
};

pub const FASHION: NicheContent = NicheContent {
    noun_phrases: &[
        "Everyday Crossbody Bag",
        "Classic Knit Beanie",
        "Minimalist Watch",
        "Layered Chain Necklace",
        "Weekender Duffel",
        "Polarized Sunglasses",
        "Cashmere-Blend Scarf",
        "Leather Card Holder",
    ],
    emoji: "🧥",
    hooks: &[
        "Style is what you reach for without thinking.",
        "The best pieces work with everything you own.",
        "Dress like the day matters.",
    ],
    problem: "Fast fashion falls apart by the third wash and never quite fit right anyway.",
    solution: "Timeless cuts and materials chosen to be worn hard and kept for years, not seasons.",
    features: &[
        "Premium fabrics with honest construction",
        "Timeless design, seasonless wear",
        "Thoughtful details: lined pockets, reinforced seams",
        "Ethically manufactured",
        "Ships in recyclable packaging",
    ],
    social_proof: "Restocked four times after selling out - 9,000+ happy customers.",
    testimonials: &[
        "The fit is perfect and it goes with everything.",
        "Two years of daily use and it still looks new.",
        "Compliments every time I wear it.",
    ],
};

/// Fallback copy for unrecognized niches.
pub const GENERIC: NicheContent = NicheContent {
    noun_phrases: &[
        "Lifestyle Essential",
        "Daily Companion",
        "Signature Collection Piece",
        "Everyday Upgrade",
        "Modern Classic",
        "Curated Favorite",
    ],
    emoji: "🌟",
    hooks: &[
        "Some products just make every day a little better.",
        "Quality you notice the moment you unbox it.",
        "The upgrade you didn't know you were missing.",
    ],
    problem: "Most everyday products are designed to be sold, not to be used.",
    solution: "This one is different: premium materials, careful construction, and a design that pulls its weight every single day.",
    features: &[
        "Premium quality materials",
        "Built to last with everyday durability",
        "Thoughtful, functional design",
        "30-day satisfaction guarantee",
        "Fast, tracked shipping",
    ],
    social_proof: "Thousands of five-star reviews across our catalog.",
    testimonials: &[
        "Exceeded my expectations in every way.",
        "Ordering a second one as a gift.",
        "Exactly as described - quality is outstanding.",
    ],
};

/// Look up the copy table for a known niche.
///
/// Returns `None` for unknown niches so the caller can log the fallback
/// explicitly instead of silently chaining defaults.
#[must_use]
pub fn content_for(niche: &str) -> Option<&'static NicheContent> {
    match niche {
        "pets" => Some(&PETS),
        "beauty" => Some(&BEAUTY),
        "fitness" => Some(&FITNESS),
        "tech" => Some(&TECH),
        "home" => Some(&HOME),
        "fashion" => Some(&FASHION),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_niches_resolve() {
        for niche in ["pets", "beauty", "fitness", "tech", "home", "fashion"] {
            assert!(content_for(niche).is_some(), "{niche} must have a table");
        }
    }

    #[test]
    fn test_unknown_niche_returns_none() {
        assert!(content_for("submarine-parts").is_none());
    }

    #[test]
    fn test_tables_are_never_empty() {
        let all = [&PETS, &BEAUTY, &FITNESS, &TECH, &HOME, &FASHION, &GENERIC];
        for table in all {
            assert!(!table.noun_phrases.is_empty());
            assert!(!table.hooks.is_empty());
            assert!(!table.features.is_empty());
            assert!(!table.testimonials.is_empty());
        }
        assert!(!POWER_WORDS.is_empty());
        assert!(!URGENCY_WORDS.is_empty());
        assert!(!CUSTOMER_NAMES.is_empty());
    }
}
