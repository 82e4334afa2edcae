//! The launch catalog: six Zafra fragrances.

use rust_decimal::Decimal;
use zafra_core::{Notes, Product, ProductId};

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    price: i64,
    original_price: i64,
    description: &'static str,
    long_description: &'static str,
    rating: f64,
    reviews: u32,
    image: &'static str,
    category: &'static str,
    size: &'static str,
    availability: &'static str,
    features: &'static [&'static str],
    top: [&'static str; 3],
    middle: [&'static str; 3],
    base: [&'static str; 3],
}

impl SeedProduct {
    fn build(&self) -> Product {
        Product {
            id: ProductId::from(self.id),
            name: self.name.to_owned(),
            price: Decimal::from(self.price),
            original_price: Decimal::from(self.original_price),
            description: self.description.to_owned(),
            long_description: self.long_description.to_owned(),
            rating: self.rating,
            reviews: self.reviews,
            image: self.image.to_owned(),
            category: self.category.to_owned(),
            brand: "Zafra".to_owned(),
            size: self.size.to_owned(),
            availability: self.availability.to_owned(),
            features: owned(self.features),
            notes: Notes {
                top: owned(&self.top),
                middle: owned(&self.middle),
                base: owned(&self.base),
            },
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

const CATALOG: [SeedProduct; 6] = [
    SeedProduct {
        id: "1",
        name: "Zafra Classic",
        price: 89,
        original_price: 120,
        description: "Timeless elegance in every drop",
        long_description: "Zafra Classic embodies timeless sophistication with its carefully balanced blend of bergamot, jasmine, and sandalwood. This signature fragrance opens with bright citrus notes that gradually give way to a heart of delicate florals, finishing with warm woody undertones that linger beautifully throughout the day.",
        rating: 4.8,
        reviews: 124,
        image: "https://images.unsplash.com/photo-1541643600914-78b084683601?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Classic",
        size: "50ml",
        availability: "In Stock",
        features: &["Long-lasting", "Unisex", "Natural Ingredients"],
        top: ["Bergamot", "Lemon", "Pink Pepper"],
        middle: ["Jasmine", "Rose", "Lily of the Valley"],
        base: ["Sandalwood", "Musk", "Amber"],
    },
    SeedProduct {
        id: "2",
        name: "Zafra Premium",
        price: 145,
        original_price: 180,
        description: "Luxury redefined for the modern soul",
        long_description: "Zafra Premium represents the perfect fusion of contemporary elegance and classic luxury. This sophisticated fragrance features rare oud wood, exotic spices, and precious florals, creating an unforgettable olfactory experience that speaks to the refined taste of the modern connoisseur.",
        rating: 4.9,
        reviews: 89,
        image: "https://images.unsplash.com/photo-1594035910387-fea47794261f?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Premium",
        size: "75ml",
        availability: "In Stock",
        features: &["Premium Quality", "Luxury Packaging", "Exclusive Blend"],
        top: ["Saffron", "Cardamom", "Orange Blossom"],
        middle: ["Oud Wood", "Damascus Rose", "Iris"],
        base: ["Vanilla", "Patchouli", "White Musk"],
    },
    SeedProduct {
        id: "3",
        name: "Zafra Luxury",
        price: 230,
        original_price: 280,
        description: "The pinnacle of olfactory artistry",
        long_description: "Zafra Luxury represents the absolute pinnacle of our craftmanship. This extraordinary fragrance features the rarest ingredients from around the world, including precious ambergris, rare orris root, and aged sandalwood. Each bottle is a masterpiece that embodies decades of perfumery expertise.",
        rating: 5.0,
        reviews: 67,
        image: "https://images.unsplash.com/photo-1592945403244-b3fbafd7f539?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Luxury",
        size: "100ml",
        availability: "Limited Edition",
        features: &["Ultra-Premium", "Hand-crafted", "Limited Edition", "Collector's Item"],
        top: ["Rare Bergamot", "Black Pepper", "Elemi"],
        middle: ["Orris Root", "Bulgarian Rose", "Ylang-Ylang"],
        base: ["Ambergris", "Aged Sandalwood", "Vetiver"],
    },
    SeedProduct {
        id: "4",
        name: "Zafra Essence",
        price: 65,
        original_price: 85,
        description: "Pure essence of sophistication",
        long_description: "Zafra Essence captures the pure, unadulterated beauty of nature's finest aromatics. This fresh and vibrant fragrance is perfect for daily wear, featuring clean citrus notes, fresh florals, and a subtle woody base that provides just the right amount of depth and character.",
        rating: 4.7,
        reviews: 156,
        image: "https://images.unsplash.com/photo-1595425970377-c9703cf48b6d?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Fresh",
        size: "30ml",
        availability: "In Stock",
        features: &["Fresh & Light", "Perfect for Daily Wear", "Affordable Luxury"],
        top: ["Grapefruit", "Green Apple", "Mint"],
        middle: ["White Tea", "Peony", "Freesia"],
        base: ["Cedar", "White Musk", "Blonde Woods"],
    },
    SeedProduct {
        id: "5",
        name: "Zafra Royal",
        price: 195,
        original_price: 240,
        description: "Fit for royalty, crafted for you",
        long_description: "Zafra Royal is an opulent fragrance inspired by the grandeur of royal courts. This majestic scent combines precious gold essence, rare spices, and exotic florals to create a truly regal olfactory experience that commands attention and admiration wherever you go.",
        rating: 4.9,
        reviews: 93,
        image: "https://images.unsplash.com/photo-1563170351-be82bc888aa4?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Royal",
        size: "75ml",
        availability: "In Stock",
        features: &["Royal Inspired", "Gold Infused", "Majestic Blend"],
        top: ["Golden Citrus", "Royal Saffron", "Pink Peppercorn"],
        middle: ["Royal Jasmine", "Turkish Rose", "Magnolia"],
        base: ["Golden Amber", "Royal Oud", "Precious Musk"],
    },
    SeedProduct {
        id: "6",
        name: "Zafra Noir",
        price: 175,
        original_price: 220,
        description: "Mystery and allure in perfect harmony",
        long_description: "Zafra Noir is a seductive and mysterious fragrance that embodies the allure of the night. This dark and enchanting scent features rich spices, smoky incense, and deep woody notes that create an irresistible aura of sophistication and intrigue.",
        rating: 4.8,
        reviews: 78,
        image: "https://images.unsplash.com/photo-1594035910387-fea47794261f?w=400&h=300&fit=crop&crop=center&q=80",
        category: "Oriental",
        size: "50ml",
        availability: "In Stock",
        features: &["Mysterious", "Evening Wear", "Seductive"],
        top: ["Black Pepper", "Dark Chocolate", "Smoky Incense"],
        middle: ["Dark Rose", "Plum", "Cinnamon"],
        base: ["Dark Oud", "Tobacco", "Vanilla Bean"],
    },
];

/// A fresh copy of the launch catalog, in display order.
#[must_use]
pub fn products() -> Vec<Product> {
    CATALOG.iter().map(SeedProduct::build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_sequential() {
        let ids: Vec<_> = products().into_iter().map(|p| p.id.as_str().to_owned()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_seed_prices_are_discounted() {
        for product in products() {
            assert!(product.price <= product.original_price, "{}", product.name);
            assert!(product.discount_percent().is_some());
        }
    }
}
