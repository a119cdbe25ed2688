//! Complete exports from record sources to KML documents.

use assert_matches::assert_matches;
use geomark::placemark::TextSource;
use geomark::record::PropertyValue;
use geomark::{
    CsvTable, ExportConfigBuilder, ExportError, Exporter, RecordError, RecordIssue, TimeSeries,
    TimeSeriesCollection,
};
use insta::assert_compact_debug_snapshot;

fn export_csv(csv: &str, builder: ExportConfigBuilder) -> (String, geomark::ExportSummary) {
    let mut table = CsvTable::from_reader("test", csv.as_bytes()).expect("table");
    let exporter = Exporter::new(builder.build().expect("config"));

    let mut output = vec![];
    let summary = exporter
        .export(table.rows(), &mut output)
        .expect("export");
    (String::from_utf8(output).expect("utf8"), summary)
}

fn ring_lines(output: &str) -> Vec<&str> {
    let start = output.find("<coordinates>\n").expect("ring") + "<coordinates>\n".len();
    let end = start + output[start..].find("</coordinates>").expect("ring end");
    output[start..end]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[test]
fn single_point_station() {
    let (output, summary) = export_csv(
        "name,lon,lat\nSite A,-105.0,39.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_name_field("name"),
    );

    assert_eq!(summary.placemarks_written, 1);
    assert!(summary.is_clean());
    assert_eq!(output.matches("<Placemark>").count(), 1);
    assert!(output.contains("<name>Site A</name>"));
    assert!(output.contains("<coordinates>-105.0,39.0,0</coordinates>"));
    assert!(!output.contains("<Style"));
    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(output.ends_with("</kml>\n"));
}

#[test]
fn records_without_coordinates_are_skipped_silently() {
    let (output, summary) = export_csv(
        "name,lon,lat\nA,1.0,2.0\nB,3.0,\nC,5.0,6.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_name_field("name"),
    );

    assert_eq!(summary.placemarks_written, 2);
    assert_eq!(summary.skipped, 1);
    assert!(summary.issues.is_empty());
    assert!(!output.contains("<name>B</name>"));
}

#[test]
fn open_polygon_is_closed() {
    let (output, summary) = export_csv(
        "id,wkt\n1,\"POLYGON((0 0, 1 0, 1 1))\"\n",
        ExportConfigBuilder::new("parcels").with_wkt_field("wkt"),
    );

    assert_eq!(summary.placemarks_written, 1);
    assert_eq!(
        ring_lines(&output),
        vec!["0.0,0.0,0", "1.0,0.0,0", "1.0,1.0,0", "0.0,0.0,0"]
    );
}

// Every input point of the ring is written, and the first point is repeated only when the last one differs from it.
// A closed ring therefore keeps its own closing point as the 4th line and gets nothing appended.
#[test]
fn closed_polygon_has_no_duplicate() {
    let (output, _) = export_csv(
        "id,wkt\n1,\"POLYGON((0 0, 1 0, 1 1, 0 0))\"\n",
        ExportConfigBuilder::new("parcels").with_wkt_field("wkt"),
    );

    assert_eq!(
        ring_lines(&output),
        vec!["0.0,0.0,0", "1.0,0.0,0", "1.0,1.0,0", "0.0,0.0,0"]
    );
}

#[test]
fn wkt_elevation_is_written() {
    let (output, summary) = export_csv(
        "id,wkt\n1,POINT Z (1 2 3)\n2,\"POLYGON Z ((0 0 1, 1 0 1, 1 1 1))\"\n",
        ExportConfigBuilder::new("parcels").with_wkt_field("wkt"),
    );

    assert!(summary.is_clean());
    assert_eq!(summary.placemarks_written, 2);
    assert!(output.contains("<coordinates>1.0,2.0,3.0</coordinates>"));
    assert_eq!(
        ring_lines(&output),
        vec!["0.0,0.0,1.0", "1.0,0.0,1.0", "1.0,1.0,1.0", "0.0,0.0,1.0"]
    );
}

#[test]
fn non_finite_coordinates_are_reported() {
    let (output, summary) = export_csv(
        "name,lon,lat\nA,NaN,inf\nB,1.0,2.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_name_field("name"),
    );

    assert_eq!(summary.placemarks_written, 1);
    assert_matches!(
        summary.issues.as_slice(),
        [RecordIssue {
            index: 0,
            error: RecordError::InvalidNumber { .. }
        }]
    );
    assert!(!output.contains("NaN"));
}

#[test]
fn markup_descriptions_are_wrapped() {
    let (output, _) = export_csv(
        "name,info,lon,lat\nA,<b>Gauge</b>,1.0,2.0\nB,Gauge,3.0,4.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_name_field("name")
            .with_placemark_description(TextSource::field("info")),
    );

    assert!(output.contains("<description><![CDATA[<b>Gauge</b>]]></description>"));
    assert!(output.contains("<description>Gauge</description>"));
}

#[test]
fn both_geometry_modes_fail_before_export() {
    let result = ExportConfigBuilder::new("stations")
        .with_point_fields("lon", "lat")
        .with_wkt_field("wkt")
        .build();
    assert_compact_debug_snapshot!(result.map(|_| ()), @r#"Err(Configuration("point fields and WKT field cannot be used together"))"#);
}

#[test]
fn recoverable_errors_are_collected_in_order() {
    let (output, summary) = export_csv(
        "name,wkt\nA,POINT (1 2)\nB,\"LINESTRING (0 0, 1 1)\"\nC,POINT (oops)\nD,\"POLYGON((0 0, 1 0, 1 1))\"\n",
        ExportConfigBuilder::new("mixed")
            .with_wkt_field("wkt")
            .with_name_field("name"),
    );

    assert_eq!(summary.placemarks_written, 2);
    assert_eq!(summary.issues.len(), 2);
    assert_eq!(summary.issues[0].index, 1);
    assert_matches!(summary.issues[0].error, RecordError::UnknownShape(_));
    assert_eq!(summary.issues[1].index, 2);
    assert_matches!(summary.issues[1].error, RecordError::InvalidGeometry { .. });

    let a = output.find("<name>A</name>").expect("A");
    let d = output.find("<name>D</name>").expect("D");
    assert!(a < d);
}

#[test]
fn unknown_field_is_reported() {
    let (_, summary) = export_csv(
        "name,lon,lat\nA,1.0,2.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_name_field("title"),
    );

    assert_eq!(summary.placemarks_written, 0);
    assert_compact_debug_snapshot!(summary.issues, @r#"[RecordIssue { index: 0, error: FieldNotFound("title") }]"#);
}

#[test]
fn time_series_with_templates() {
    let collection: TimeSeriesCollection = vec![
        TimeSeries::new("PLATTE")
            .with_type("Streamflow", "Day")
            .with_description("<i>South Platte</i>")
            .with_property("Longitude", PropertyValue::Number(-105.89194))
            .with_property("Latitude", PropertyValue::Number(38.99333))
            .with_property("Basin", PropertyValue::Text("Upper".into())),
        TimeSeries::new("NOWHERE").with_type("Streamflow", "Day"),
    ]
    .into_iter()
    .collect();

    let config = ExportConfigBuilder::new("series")
        .with_point_fields("Longitude", "Latitude")
        .with_name_template("%L - %T (%I)")
        .with_placemark_description(TextSource::template("%D, ${property:Basin} basin"))
        .with_style_url("#gauge")
        .build()
        .expect("config");

    let mut output = vec![];
    let summary = Exporter::new(config)
        .export(collection.records(), &mut output)
        .expect("export");
    let output = String::from_utf8(output).expect("utf8");

    assert_eq!(summary.placemarks_written, 1);
    assert_eq!(summary.skipped, 1);
    assert!(output.contains("<name>PLATTE - Streamflow (Day)</name>"));
    assert!(output.contains("<description><![CDATA[<i>South Platte</i>, Upper basin]]></description>"));
    assert!(output.contains("<styleUrl>#gauge</styleUrl>"));
    assert!(output.contains("<coordinates>-105.8919,38.9933,0</coordinates>"));
}

#[test]
fn style_file_is_inserted_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let style = dir.path().join("style.kml");
    std::fs::write(&style, "  <Style id=\"gauge\"/>\n").expect("style");

    let (output, _) = export_csv(
        "name,lon,lat\nA,1.0,2.0\nB,3.0,4.0\n",
        ExportConfigBuilder::new("stations")
            .with_point_fields("lon", "lat")
            .with_style_file(&style),
    );

    assert_eq!(output.matches("<Style id=\"gauge\"/>").count(), 1);
    let style_at = output.find("<Style").expect("style");
    let placemark_at = output.find("<Placemark>").expect("placemark");
    assert!(style_at < placemark_at);
}

#[test]
fn unreadable_style_file_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let style = dir.path().join("style.kml");
    std::fs::write(&style, "<Style/>").expect("style");

    let config = ExportConfigBuilder::new("stations")
        .with_point_fields("lon", "lat")
        .with_style_file(&style)
        .build()
        .expect("config");
    std::fs::remove_file(&style).expect("remove style");

    let mut table = CsvTable::from_reader("stations", "name,lon,lat\nA,1,2\n".as_bytes())
        .expect("table");
    let output = dir.path().join("stations.kml");
    let result = Exporter::new(config).export_to_path(table.rows(), &output);

    assert_matches!(result, Err(ExportError::Style { .. }));
    assert!(!output.exists());
}

#[test]
fn export_to_path_creates_folders() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("nested/out/stations.kml");

    let config = ExportConfigBuilder::new("stations")
        .with_point_fields("lon", "lat")
        .with_elevation_field("elev")
        .with_precision(2)
        .build()
        .expect("config");
    let mut table = CsvTable::from_reader(
        "stations",
        "lon,lat,elev\n-105.123,39.457,1650.5\n".as_bytes(),
    )
    .expect("table");

    let summary = Exporter::new(config)
        .export_to_path(table.rows(), &output)
        .expect("export");

    let written = std::fs::read_to_string(&output).expect("output");
    assert_eq!(summary.bytes_written, written.len() as u64);
    assert!(written.contains("<coordinates>-105.12,39.46,1650.5</coordinates>"));
    assert!(written.contains("<name>stations</name>"));
}
