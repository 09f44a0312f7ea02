use fyyur::{ArtistFields, Genres, StoreError, VenueFields};

mod common;
use common::{artist_fields, store, venue_fields};

#[test]
fn test_create_and_find_venue() {
    let mut store = store();

    let created = store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();
    assert!(created.id > 0);
    assert!(!created.is_looking_talent);

    let fetched = store.find_venue(created.id).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.genres.as_slice(), ["Jazz", "Folk"]);
}

#[test]
fn test_new_records_get_distinct_ids() {
    let mut store = store();
    let a = store.create_artist(&artist_fields("Guns N Petals")).unwrap();
    let b = store.create_artist(&artist_fields("Matt Quevedo")).unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.list_artists().unwrap().len(), 2);
}

#[test]
fn test_find_missing_records() {
    let store = store();
    assert!(matches!(
        store.find_venue(42),
        Err(StoreError::NotFound { entity: "venue", id: 42 })
    ));
    assert!(matches!(
        store.find_artist(7),
        Err(StoreError::NotFound { entity: "artist", id: 7 })
    ));
}

#[test]
fn test_genres_round_trip_through_store() {
    let mut store = store();
    let fields = ArtistFields {
        genres: Genres::new(["Hip-Hop", "R&B", "Rock n Roll"]),
        ..artist_fields("The Wild Sax Band")
    };
    let artist = store.create_artist(&fields).unwrap();
    assert_eq!(
        store.find_artist(artist.id).unwrap().genres.as_slice(),
        ["Hip-Hop", "R&B", "Rock n Roll"]
    );

    let empty = store
        .create_artist(&ArtistFields {
            genres: Genres::default(),
            ..artist_fields("Quiet One")
        })
        .unwrap();
    assert!(store.find_artist(empty.id).unwrap().genres.is_empty());
}

#[test]
fn test_update_venue_replaces_fields() {
    let mut store = store();
    let venue = store
        .create_venue(&venue_fields("Park Square", "San Francisco", "CA"))
        .unwrap();

    let updated = store
        .update_venue(
            venue.id,
            &VenueFields {
                name: "Park Square Live Music & Coffee".to_string(),
                phone: "415-000-1234".to_string(),
                is_looking_talent: true,
                seeking_description: Some("Acoustic sets".to_string()),
                image_link: None,
                ..venue_fields("ignored", "Oakland", "CA")
            },
        )
        .unwrap();

    assert_eq!(updated.id, venue.id);
    assert_eq!(updated.name, "Park Square Live Music & Coffee");
    assert_eq!(updated.city, "Oakland");
    assert!(updated.is_looking_talent);
    assert_eq!(updated.image_link, None);
    assert_eq!(store.find_venue(venue.id).unwrap(), updated);
}

#[test]
fn test_update_missing_id_mutates_nothing() {
    let mut store = store();
    let venue = store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();
    let artist = store.create_artist(&artist_fields("Matt Quevedo")).unwrap();

    let err = store
        .update_venue(venue.id + 100, &venue_fields("Elsewhere", "Boise", "ID"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "venue", .. }));

    let err = store
        .update_artist(artist.id + 100, &artist_fields("Nobody"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "artist", .. }));

    assert_eq!(store.list_venues().unwrap(), vec![venue]);
    assert_eq!(store.list_artists().unwrap(), vec![artist]);
}

#[test]
fn test_update_artist() {
    let mut store = store();
    let artist = store.create_artist(&artist_fields("Guns N Petals")).unwrap();

    let updated = store
        .update_artist(
            artist.id,
            &ArtistFields {
                is_looking_venues: true,
                seeking_description: Some("Bay Area gigs".to_string()),
                ..artist_fields("Guns N Roses")
            },
        )
        .unwrap();

    assert_eq!(updated.name, "Guns N Roses");
    assert!(updated.is_looking_venues);
    assert_eq!(store.find_artist(artist.id).unwrap(), updated);
}

#[test]
fn test_search_venues_by_substring() {
    let mut store = store();
    store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();
    store
        .create_venue(&venue_fields(
            "Park Square Live Music & Coffee",
            "San Francisco",
            "CA",
        ))
        .unwrap();

    let names = |term: &str| -> Vec<String> {
        store
            .search_venues(term)
            .unwrap()
            .into_iter()
            .map(|venue| venue.name)
            .collect()
    };

    assert_eq!(names("Hop"), ["The Musical Hop"]);
    assert_eq!(
        names("Music"),
        ["The Musical Hop", "Park Square Live Music & Coffee"]
    );
    assert_eq!(names("hop"), ["The Musical Hop"]);
    assert_eq!(names("MUSIC").len(), 2);
    assert!(names("Jazz Club").is_empty());
}

#[test]
fn test_empty_search_term_matches_everything() {
    let mut store = store();
    for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
        store.create_artist(&artist_fields(name)).unwrap();
    }
    store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();

    assert_eq!(store.search_artists("").unwrap().len(), 3);
    assert_eq!(store.search_venues("").unwrap().len(), 1);
}

#[test]
fn test_search_artists() {
    let mut store = store();
    for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
        store.create_artist(&artist_fields(name)).unwrap();
    }

    assert_eq!(store.search_artists("A").unwrap().len(), 3);
    let band: Vec<_> = store
        .search_artists("band")
        .unwrap()
        .into_iter()
        .map(|artist| artist.name)
        .collect();
    assert_eq!(band, ["The Wild Sax Band"]);
}

#[test]
fn test_search_treats_wildcards_literally() {
    let mut store = store();
    store
        .create_venue(&venue_fields("100% Live", "Boise", "ID"))
        .unwrap();
    store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();

    assert_eq!(store.search_venues("%").unwrap().len(), 1);
    assert!(store.search_venues("_").unwrap().is_empty());
}

#[test]
fn test_search_folds_non_ascii_case() {
    let mut store = store();
    let cafe = store
        .create_venue(&venue_fields("Café Élysée", "Paris", "IDF"))
        .unwrap()
        .id;
    store
        .create_venue(&venue_fields("The Musical Hop", "San Francisco", "CA"))
        .unwrap();

    for term in ["café", "CAFÉ", "ÉLYSÉE", "élysée"] {
        let hits: Vec<i64> = store
            .search_venues(term)
            .unwrap()
            .into_iter()
            .map(|venue| venue.id)
            .collect();
        assert_eq!(hits, [cafe], "term {term:?}");
    }
    assert!(store.search_venues("CAFE").unwrap().is_empty());

    let bjork = store.create_artist(&artist_fields("Björk Guðmundsdóttir")).unwrap().id;
    store.create_artist(&artist_fields("Guns N Petals")).unwrap();
    let hits: Vec<i64> = store
        .search_artists("BJÖRK")
        .unwrap()
        .into_iter()
        .map(|artist| artist.id)
        .collect();
    assert_eq!(hits, [bjork]);
}

#[test]
fn test_non_ascii_search_keeps_wildcards_literal() {
    let mut store = store();
    store
        .create_venue(&venue_fields("Über_Bar", "Berlin", "BE"))
        .unwrap();
    store
        .create_venue(&venue_fields("ÜberXBar", "Berlin", "BE"))
        .unwrap();

    let names: Vec<String> = store
        .search_venues("über_")
        .unwrap()
        .into_iter()
        .map(|venue| venue.name)
        .collect();
    assert_eq!(names, ["Über_Bar"]);
    assert!(store.search_venues("über%bar").unwrap().is_empty());
}

#[test]
fn test_group_venues_by_city_state() {
    let mut store = store();
    store.create_venue(&venue_fields("A", "X", "NY")).unwrap();
    store.create_venue(&venue_fields("B", "X", "NY")).unwrap();
    store.create_venue(&venue_fields("C", "Y", "CA")).unwrap();

    let groups = store.group_venues_by_city_state().unwrap();
    assert_eq!(groups.len(), 2);

    assert_eq!((groups[0].city.as_str(), groups[0].state.as_str()), ("X", "NY"));
    let first: Vec<_> = groups[0].venues.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(first, ["A", "B"]);

    assert_eq!((groups[1].city.as_str(), groups[1].state.as_str()), ("Y", "CA"));
    let second: Vec<_> = groups[1].venues.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(second, ["C"]);
}

#[test]
fn test_grouping_uses_exact_string_equality() {
    let mut store = store();
    store
        .create_venue(&venue_fields("A", "New York", "NY"))
        .unwrap();
    store
        .create_venue(&venue_fields("B", "new york", "NY"))
        .unwrap();
    store
        .create_venue(&venue_fields("C", "New York ", "NY"))
        .unwrap();

    assert_eq!(store.group_venues_by_city_state().unwrap().len(), 3);
}

#[test]
fn test_grouping_empty_store() {
    assert!(store().group_venues_by_city_state().unwrap().is_empty());
}
