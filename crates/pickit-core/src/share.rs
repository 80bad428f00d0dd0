use crate::candidate::Candidate;

/// Text shared (or copied to the clipboard) once a champion is crowned.
#[must_use]
pub fn share_text(champion: &Candidate) -> String {
    let address = champion
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or("서울");
    format!(
        "🏆 서울 푸드 월드컵 우승!\n{} ({}) ★{}\n📍 {}",
        champion.name, champion.category_label, champion.rating, address
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::FoodCategory;

    fn champion(address: Option<&str>) -> Candidate {
        Candidate {
            id: "f_jung_2".to_string(),
            place_id: None,
            name: "명동교자".to_string(),
            category: FoodCategory::Korean,
            category_label: "한식".to_string(),
            rating: 4.4,
            review_count: 8912,
            lat: 37.5634,
            lng: 126.984,
            address: address.map(str::to_string),
            photo_url: None,
            photo_urls: vec![],
            score: 4.39,
        }
    }

    #[test]
    fn includes_name_category_rating_and_address() {
        let text = share_text(&champion(Some("서울 중구 명동10길 29")));
        assert_eq!(
            text,
            "🏆 서울 푸드 월드컵 우승!\n명동교자 (한식) ★4.4\n📍 서울 중구 명동10길 29"
        );
    }

    #[test]
    fn missing_address_falls_back_to_city() {
        assert!(share_text(&champion(None)).ends_with("📍 서울"));
        assert!(share_text(&champion(Some(""))).ends_with("📍 서울"));
    }
}
