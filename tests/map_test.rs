//! End-to-end tests for sampling-location maps.

mod common;

use pretty_assertions::assert_eq;
use tempfile::tempdir;

use common::assertions::{assert_approx_eq, assert_contains_all};
use common::test_data;
use frqviz::loader::{load_dataset, LoadOptions};
use frqviz::map::{self, Control, ControlPosition, LatLng, MapOptions};
use frqviz::{create_taxon_map, FrqvizError, InteractiveMap, LeafletBackend};

#[test]
fn test_one_marker_per_row() {
    let map = create_taxon_map(&test_data::sampling_sites(), &["taxon_A", "taxon_B"]).unwrap();

    assert_eq!(map.center, LatLng(0.0, 20.0));
    assert_eq!(map.zoom, 3);
    assert_eq!(map.markers().len(), 2);

    let kilifi = &map.markers()[0];
    assert_approx_eq(kilifi.location.lat(), -3.5, None);
    assert_approx_eq(kilifi.location.lng(), 39.85, None);
    assert!(!kilifi.draggable);
    assert_eq!(
        kilifi.popup.as_ref().unwrap().content,
        "Kilifi, Kenya<br>(-3.500, 39.850)<br><hr>taxon_A: 12<br>taxon_B: 4"
    );

    let bana = map.markers()[1].popup.as_ref().unwrap();
    assert_eq!(
        bana.content,
        "Bana, Burkina Faso<br>(11.233, -4.472)<br><hr>taxon_A: <br>taxon_B: 30"
    );
}

#[test]
fn test_single_scale_control() {
    let map = create_taxon_map(&test_data::sampling_sites(), &["taxon_A"]).unwrap();

    assert_eq!(
        map.controls(),
        &[Control::Scale {
            position: ControlPosition::BottomLeft
        }]
    );
}

#[test]
fn test_missing_taxon_column() {
    let err = create_taxon_map(&test_data::sampling_sites(), &["taxon_C"]).unwrap_err();
    assert!(matches!(err, FrqvizError::MissingColumn { ref name } if name == "taxon_C"));
}

#[test]
fn test_custom_center_and_zoom() {
    let options = MapOptions {
        center: LatLng(5.0, -2.0),
        zoom: 6,
        ..MapOptions::default()
    };
    let map = map::render(
        &test_data::sampling_sites(),
        &["taxon_B"],
        &options,
        &LeafletBackend,
    )
    .unwrap();

    assert_eq!(map.center, LatLng(5.0, -2.0));
    assert_eq!(map.zoom, 6);
}

#[test]
fn test_loaded_json_map_saved() {
    let dir = tempdir().unwrap();
    let input = test_data::write_file(dir.path(), "sites.json", test_data::sampling_sites_json());

    let dataset = load_dataset(&input, &LoadOptions::default()).unwrap();
    assert_eq!(dataset.index_names(), &["country", "location"]);

    let map = create_taxon_map(&dataset, &["taxon_A"]).unwrap();

    let html_path = dir.path().join("sites.html");
    map.save(&html_path).unwrap();
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert_contains_all(
        &html,
        &["leaflet", "L.control.scale", "Kilifi, Kenya", "Bana, Burkina Faso"],
    );

    let json_path = dir.path().join("sites.json.out.json");
    map.save(&json_path).unwrap();
    let back: InteractiveMap =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_location_names_loaded_verbatim() {
    let dir = tempdir().unwrap();
    let input = test_data::write_file(
        dir.path(),
        "thai.csv",
        "country,location,latitude,longitude,taxon_A\nThailand,Nan,18.78,100.77,5\n",
    );

    let dataset = load_dataset(&input, &LoadOptions::default()).unwrap();
    let map = create_taxon_map(&dataset, &["taxon_A"]).unwrap();

    assert_eq!(
        map.markers()[0].popup.as_ref().unwrap().content,
        "Nan, Thailand<br>(18.780, 100.770)<br><hr>taxon_A: 5"
    );
}

#[test]
fn test_whole_float_counts_keep_decimal_point() {
    let dir = tempdir().unwrap();
    let input = test_data::write_file(
        dir.path(),
        "counts.csv",
        "country,location,latitude,longitude,taxon_A\nKenya,Kilifi,-3.5,39.85,12.0\nMali,Bamako,12.65,-8.0,\n",
    );

    let dataset = load_dataset(&input, &LoadOptions::default()).unwrap();
    let map = create_taxon_map(&dataset, &["taxon_A"]).unwrap();

    assert_eq!(
        map.markers()[0].popup.as_ref().unwrap().content,
        "Kilifi, Kenya<br>(-3.500, 39.850)<br><hr>taxon_A: 12.0"
    );
}
