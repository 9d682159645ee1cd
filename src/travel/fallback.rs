//! Static substitute data used when a provider is unavailable.

use super::types::{NearbyPlaces, Photo, Restaurant};
use crate::geo::{LatLng, Location};
use crate::providers::CarOffer;
use crate::recommend::{Candidate, Provenance};

/// Where searches land when a city cannot be resolved at all.
pub const DEFAULT_LOCATION: LatLng = LatLng::new(6.2442, -75.5812);

const MEDELLIN: LatLng = DEFAULT_LOCATION;
const SANTIAGO: LatLng = LatLng::new(-33.4489, -70.6693);
const BOGOTA: LatLng = LatLng::new(4.7110, -74.0721);

/// Substring of the lowercased city name → coordinates, checked in order.
const KNOWN_CITIES: &[(&str, LatLng)] = &[
    ("medellin", MEDELLIN),
    ("medellín", MEDELLIN),
    ("santiago", SANTIAGO),
    ("bogota", BOGOTA),
    ("bogotá", BOGOTA),
    ("paris", LatLng::new(48.8566, 2.3522)),
    ("london", LatLng::new(51.5074, -0.1278)),
    ("new york", LatLng::new(40.7128, -74.0060)),
    ("madrid", LatLng::new(40.4168, -3.7038)),
    ("barcelona", LatLng::new(41.3851, 2.1734)),
];

/// Coordinates for `city` from the built-in table, else Medellín.
pub fn fallback_coordinates(city: &str) -> LatLng {
    let city = city.to_lowercase();
    KNOWN_CITIES
        .iter()
        .find(|(key, _)| city.contains(key))
        .map(|(_, point)| *point)
        .unwrap_or(DEFAULT_LOCATION)
}

fn is_medellin(city: &str) -> bool {
    let city = city.to_lowercase();
    city.contains("medellin") || city.contains("medellín")
}

struct Attraction {
    id: &'static str,
    name: &'static str,
    rating: f64,
    user_ratings_total: u32,
    price_level: u8,
    address: &'static str,
    at: LatLng,
    category: &'static str,
    types: &'static [&'static str],
    hours: f64,
    description: &'static str,
    image: &'static str,
}

const MEDELLIN_ATTRACTIONS: &[Attraction] = &[
    Attraction {
        id: "comuna_13_medellin",
        name: "Comuna 13 (Graffiti Tour)",
        rating: 4.8,
        user_ratings_total: 2500,
        price_level: 2,
        address: "Comuna 13, Medellín, Colombia",
        at: LatLng::new(6.2675, -75.5950),
        category: "tourist_attraction",
        types: &["tourist_attraction", "point_of_interest"],
        hours: 3.0,
        description: "Famous neighborhood transformation with colorful street art and outdoor escalators.",
        image: "https://via.placeholder.com/400x200.png?text=Comuna+13",
    },
    Attraction {
        id: "plaza_botero_medellin",
        name: "Plaza Botero",
        rating: 4.6,
        user_ratings_total: 1800,
        price_level: 0,
        address: "Cra. 52 #52-43, La Candelaria, Medellín, Colombia",
        at: LatLng::new(6.2518, -75.5636),
        category: "tourist_attraction",
        types: &["tourist_attraction", "park"],
        hours: 2.0,
        description: "Iconic plaza featuring 23 bronze sculptures by renowned artist Fernando Botero.",
        image: "https://via.placeholder.com/400x200.png?text=Plaza+Botero",
    },
    Attraction {
        id: "guatape_day_trip",
        name: "Guatapé & El Peñón Rock",
        rating: 4.9,
        user_ratings_total: 3200,
        price_level: 3,
        address: "Guatapé, Antioquia, Colombia",
        at: LatLng::new(6.2317, -75.1581),
        category: "tourist_attraction",
        types: &["tourist_attraction", "natural_feature"],
        hours: 8.0,
        description: "Colorful town and massive rock with 740 steps offering panoramic views.",
        image: "https://via.placeholder.com/400x200.png?text=Guatape",
    },
    Attraction {
        id: "metro_cable_medellin",
        name: "Metro Cable & Arví Park",
        rating: 4.7,
        user_ratings_total: 1500,
        price_level: 1,
        address: "Medellín Metro Cable, Colombia",
        at: LatLng::new(6.2308, -75.5664),
        category: "tourist_attraction",
        types: &["tourist_attraction", "transportation"],
        hours: 4.0,
        description: "Cable car system offering city views and access to Arví ecological park.",
        image: "https://via.placeholder.com/400x200.png?text=Metro+Cable",
    },
    Attraction {
        id: "el_poblado_medellin",
        name: "El Poblado District",
        rating: 4.5,
        user_ratings_total: 1200,
        price_level: 3,
        address: "El Poblado, Medellín, Colombia",
        at: LatLng::new(6.2077, -75.5636),
        category: "neighborhood",
        types: &["neighborhood", "point_of_interest"],
        hours: 4.0,
        description: "Upscale district with rooftop bars, restaurants, and vibrant nightlife.",
        image: "https://via.placeholder.com/400x200.png?text=El+Poblado",
    },
];

impl Attraction {
    fn to_candidate(&self) -> Candidate {
        let mut c = Candidate::new(self.id, self.name, self.category);
        c.rating = Some(self.rating);
        c.user_ratings_total = Some(self.user_ratings_total);
        c.price_level = Some(self.price_level);
        c.address = Some(self.address.to_string());
        c.location = Location::from(self.at);
        c.types = self.types.iter().map(|t| t.to_string()).collect();
        c.estimated_duration = self.hours;
        c.description = self.description.to_string();
        c.image_url = Some(self.image.to_string());
        c.provenance = Provenance::Fallback;
        c
    }
}

/// Attractions to show when the places provider failed or found nothing.
///
/// Medellín has a curated list; anywhere else gets a single city-center
/// entry at the search point.
pub fn fallback_attractions(city: Option<&str>, at: LatLng) -> Vec<Candidate> {
    let city = city.unwrap_or_default();
    if is_medellin(city) {
        return MEDELLIN_ATTRACTIONS.iter().map(Attraction::to_candidate).collect();
    }

    let city_label = if city.trim().is_empty() {
        "Unknown City"
    } else {
        city.trim()
    };
    let mut c = Candidate::new("city_center_generic", "City Center", "tourist_attraction");
    c.rating = Some(4.2);
    c.user_ratings_total = Some(800);
    c.price_level = Some(1);
    c.address = Some(format!("City Center, {}", city_label));
    c.location = Location::from(at);
    c.types = vec!["tourist_attraction".to_string()];
    c.estimated_duration = 3.0;
    c.description = "Historic city center with local culture and attractions.".to_string();
    c.image_url = Some("https://via.placeholder.com/400x200.png?text=City+Center".to_string());
    c.provenance = Provenance::Fallback;
    vec![c]
}

/// Sample rental offers, cheapest first.
pub fn mock_cars(top_n: usize) -> Vec<CarOffer> {
    const CARS: &[(&str, &str, f64, &str, &str)] = &[
        ("Toyota Corolla", "Economy", 299.99, "Hertz", "https://example.com/corolla.jpg"),
        ("Honda Civic", "Compact", 349.99, "Avis", "https://example.com/civic.jpg"),
        ("Ford Mustang", "Sports", 599.99, "Enterprise", "https://example.com/mustang.jpg"),
        ("BMW 3 Series", "Luxury", 799.99, "Sixt", "https://example.com/bmw.jpg"),
        ("Mercedes-Benz C-Class", "Premium", 899.99, "Europcar", "https://example.com/mercedes.jpg"),
    ];

    CARS.iter()
        .take(top_n)
        .map(|(model, group, price, supplier, image)| CarOffer {
            car_model: model.to_string(),
            car_group: group.to_string(),
            price: *price,
            currency: "USD".to_string(),
            pickup_location_name: "Sample Airport".to_string(),
            supplier_name: supplier.to_string(),
            image_url: Some(image.to_string()),
        })
        .collect()
}

/// One placeholder restaurant.
pub fn sample_restaurants() -> NearbyPlaces {
    NearbyPlaces {
        restaurants: vec![Restaurant {
            name: "Sample Restaurant".to_string(),
            kind: "restaurant".to_string(),
            rating: 4.5,
            price_level: 2,
            address: "Sample Address".to_string(),
            photos: vec![Photo {
                url: "https://example.com/photo1.jpg".to_string(),
                width: 800,
                height: 600,
            }],
            features: "Cuisine: Chinese, Western".to_string(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_coordinates_substring_match() {
        assert_eq!(fallback_coordinates("Paris, France"), LatLng::new(48.8566, 2.3522));
        assert_eq!(fallback_coordinates("BOGOTÁ"), BOGOTA);
        assert_eq!(fallback_coordinates("Santiago Chile"), SANTIAGO);
        assert_eq!(fallback_coordinates("Reykjavik"), DEFAULT_LOCATION);
    }

    #[test]
    fn test_medellin_fallback_attractions() {
        let list = fallback_attractions(Some("Medellín, Colombia"), DEFAULT_LOCATION);
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].id, "comuna_13_medellin");
        assert_eq!(list[2].estimated_duration, 8.0);
        assert!(list.iter().all(Candidate::is_fallback));
    }

    #[test]
    fn test_generic_fallback_uses_search_point() {
        let at = LatLng::new(35.68, 139.69);
        let list = fallback_attractions(Some("Tokyo"), at);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "city_center_generic");
        assert_eq!(list[0].location.to_lat_lng(), Some(at));
        assert_eq!(list[0].address.as_deref(), Some("City Center, Tokyo"));

        let unnamed = fallback_attractions(None, at);
        assert_eq!(unnamed[0].address.as_deref(), Some("City Center, Unknown City"));
    }

    #[test]
    fn test_mock_cars_truncate() {
        assert_eq!(mock_cars(5).len(), 5);
        let two = mock_cars(2);
        assert_eq!(two.len(), 2);
        assert_eq!(two[1].car_model, "Honda Civic");
        assert!(mock_cars(0).is_empty());
    }
}
