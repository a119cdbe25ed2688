//! Writing placemark documents in KML 2.2 format.
//!
//! The document is written in a single pass: header, style block, placemarks in their original order and the footer.
//! Nothing written to the sink is ever revisited.

use std::io::Write;

use geomark_types::{Polygon, Position, Shape};

use crate::placemark::{Placemark, TextContent};

mod coordinates;
mod text;

pub use coordinates::{CoordinateFormat, MissingElevation, DEFAULT_PRECISION};
pub use text::{cdata, escape};

/// KML namespace.
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Content of an output document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportDocument {
    /// Document title.
    pub title: String,
    /// Document description.
    pub description: TextContent,
    /// Style markup inserted before the placemarks.
    pub style: Option<String>,
    /// Placemarks in input order.
    pub placemarks: Vec<Placemark>,
}

/// Statistics of a written document.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of placemarks written.
    pub placemarks_written: usize,
    /// Number of bytes written.
    pub bytes_written: u64,
}

/// KML document writer.
pub struct KmlWriter<W: Write> {
    sink: CountingWriter<W>,
    format: CoordinateFormat,
    geometry_insert: Option<String>,
}

impl<W: Write> KmlWriter<W> {
    /// Creates a writer with default coordinate format.
    pub fn new(sink: W) -> Self {
        Self {
            sink: CountingWriter::new(sink),
            format: CoordinateFormat::default(),
            geometry_insert: None,
        }
    }

    /// Sets format of the written coordinates.
    pub fn with_coordinate_format(mut self, format: CoordinateFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets raw markup inserted at the start of every geometry element (e.g. `<extrude>1</extrude>`).
    pub fn with_geometry_insert(mut self, insert: Option<String>) -> Self {
        self.geometry_insert = insert;
        self
    }

    /// Writes the whole document and flushes the sink.
    pub fn write_document(mut self, document: &ExportDocument) -> std::io::Result<WriteSummary> {
        self.write_header(document)?;

        let mut placemarks_written = 0;
        for placemark in &document.placemarks {
            if self.write_placemark(placemark)? {
                placemarks_written += 1;
            }
        }

        self.write_footer()?;
        self.sink.flush()?;

        Ok(WriteSummary {
            placemarks_written,
            bytes_written: self.sink.bytes_written,
        })
    }

    fn write_header(&mut self, document: &ExportDocument) -> std::io::Result<()> {
        let sink = &mut self.sink;
        writeln!(sink, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(sink, r#"<kml xmlns="{KML_NAMESPACE}">"#)?;
        writeln!(sink, " <Document>")?;
        writeln!(sink, "  <name>{}</name>", escape(&document.title))?;
        writeln!(
            sink,
            "  <description>{}</description>",
            text::content(&document.description)
        )?;

        if let Some(style) = &document.style {
            write_fragment(sink, style)?;
        }

        Ok(())
    }

    /// Writes a placemark. Returns false if the placemark has no geometry and was skipped.
    fn write_placemark(&mut self, placemark: &Placemark) -> std::io::Result<bool> {
        let Some(geometry) = &placemark.geometry else {
            log::debug!("Placemark '{}' has no geometry, skipping", placemark.name);
            return Ok(false);
        };

        writeln!(self.sink, "  <Placemark>")?;
        writeln!(self.sink, "   <name>{}</name>", escape(&placemark.name))?;
        writeln!(
            self.sink,
            "   <description>{}</description>",
            text::content(&placemark.description)
        )?;
        if let Some(style_url) = &placemark.style_url {
            writeln!(self.sink, "   <styleUrl>{}</styleUrl>", escape(style_url))?;
        }

        match geometry {
            Shape::Point(position) => self.write_point(position)?,
            Shape::Polygon(polygon) => self.write_polygon(polygon)?,
        }

        writeln!(self.sink, "  </Placemark>")?;
        Ok(true)
    }

    fn write_point(&mut self, position: &Position) -> std::io::Result<()> {
        writeln!(self.sink, "   <Point>")?;
        self.write_geometry_insert()?;
        writeln!(
            self.sink,
            "    <coordinates>{}</coordinates>",
            self.format.position(position)
        )?;
        writeln!(self.sink, "   </Point>")
    }

    fn write_polygon(&mut self, polygon: &Polygon) -> std::io::Result<()> {
        writeln!(self.sink, "   <Polygon>")?;
        self.write_geometry_insert()?;
        writeln!(self.sink, "    <outerBoundaryIs>")?;
        writeln!(self.sink, "     <LinearRing>")?;
        writeln!(self.sink, "      <coordinates>")?;
        for position in polygon.outer_ring().iter_points_closing() {
            writeln!(self.sink, "       {}", self.format.position(position))?;
        }
        writeln!(self.sink, "      </coordinates>")?;
        writeln!(self.sink, "     </LinearRing>")?;
        writeln!(self.sink, "    </outerBoundaryIs>")?;
        writeln!(self.sink, "   </Polygon>")
    }

    fn write_geometry_insert(&mut self) -> std::io::Result<()> {
        match &self.geometry_insert {
            Some(insert) => write_fragment(&mut self.sink, insert),
            None => Ok(()),
        }
    }

    fn write_footer(&mut self) -> std::io::Result<()> {
        writeln!(self.sink, " </Document>")?;
        writeln!(self.sink, "</kml>")
    }
}

/// Writes raw markup on its own line(s).
fn write_fragment(sink: &mut impl Write, fragment: &str) -> std::io::Result<()> {
    let fragment = fragment.trim_end_matches(['\r', '\n']);
    if fragment.is_empty() {
        return Ok(());
    }

    writeln!(sink, "{fragment}")
}

struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use geomark_types::{lonlat, Ring};

    use super::*;

    fn placemark(name: &str, geometry: Option<Shape>) -> Placemark {
        Placemark {
            name: name.into(),
            description: TextContent::default(),
            geometry,
            style_url: None,
        }
    }

    fn polygon(points: &[Position]) -> Shape {
        Shape::Polygon(Polygon::new(Ring::new(points.to_vec()).expect("ring")))
    }

    fn write(document: &ExportDocument) -> (String, WriteSummary) {
        let mut buffer = vec![];
        let summary = KmlWriter::new(&mut buffer)
            .write_document(document)
            .expect("written");
        (String::from_utf8(buffer).expect("utf8"), summary)
    }

    fn coordinate_lines(output: &str) -> Vec<&str> {
        let start = output.find("<coordinates>\n").expect("ring coordinates") + 14;
        let end = output.find("      </coordinates>").expect("end of coordinates");
        output[start..end].lines().map(str::trim).collect()
    }

    #[test]
    fn document_structure() {
        let document = ExportDocument {
            title: "Stations".into(),
            description: TextContent::classify("Upper basin"),
            style: Some("  <Style id=\"gauge\"/>\n".into()),
            placemarks: vec![Placemark {
                name: "Site A".into(),
                description: TextContent::classify("<b>Gauge</b>"),
                geometry: Some(Shape::Point(lonlat!(-105.0, 39.0))),
                style_url: Some("#gauge".into()),
            }],
        };

        let (output, summary) = write(&document);
        let expected = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
 <Document>
  <name>Stations</name>
  <description>Upper basin</description>
  <Style id="gauge"/>
  <Placemark>
   <name>Site A</name>
   <description><![CDATA[<b>Gauge</b>]]></description>
   <styleUrl>#gauge</styleUrl>
   <Point>
    <coordinates>-105.0,39.0,0</coordinates>
   </Point>
  </Placemark>
 </Document>
</kml>
"##;
        assert_eq!(output, expected);
        assert_eq!(summary.placemarks_written, 1);
        assert_eq!(summary.bytes_written, expected.len() as u64);
    }

    #[test]
    fn placemarks_without_geometry_are_skipped() {
        let document = ExportDocument {
            placemarks: vec![
                placemark("a", Some(Shape::Point(lonlat!(1.0, 2.0)))),
                placemark("b", None),
                placemark("c", Some(Shape::Point(lonlat!(3.0, 4.0)))),
            ],
            ..Default::default()
        };

        let (output, summary) = write(&document);
        assert_eq!(summary.placemarks_written, 2);
        assert_eq!(output.matches("<Placemark>").count(), 2);
        assert!(output.find("<name>a</name>") < output.find("<name>c</name>"));
    }

    #[test]
    fn open_ring_is_closed() {
        let document = ExportDocument {
            placemarks: vec![placemark(
                "area",
                Some(polygon(&[lonlat!(0.0, 0.0), lonlat!(1.0, 0.0), lonlat!(1.0, 1.0)])),
            )],
            ..Default::default()
        };

        let (output, _) = write(&document);
        assert_eq!(
            coordinate_lines(&output),
            vec!["0.0,0.0,0", "1.0,0.0,0", "1.0,1.0,0", "0.0,0.0,0"]
        );
    }

    #[test]
    fn closed_ring_is_not_extended() {
        let document = ExportDocument {
            placemarks: vec![placemark(
                "area",
                Some(polygon(&[
                    lonlat!(0.0, 0.0),
                    lonlat!(1.0, 0.0),
                    lonlat!(1.0, 1.0),
                    lonlat!(0.0, 0.0),
                ])),
            )],
            ..Default::default()
        };

        let (output, _) = write(&document);
        assert_eq!(coordinate_lines(&output).len(), 4);
    }

    #[test]
    fn single_point_ring() {
        let document = ExportDocument {
            placemarks: vec![placemark("dot", Some(polygon(&[lonlat!(2.0, 3.0)])))],
            ..Default::default()
        };

        let (output, _) = write(&document);
        assert_eq!(coordinate_lines(&output), vec!["2.0,3.0,0"]);
    }

    #[test]
    fn geometry_insert_goes_inside_geometry_element() {
        let document = ExportDocument {
            placemarks: vec![placemark(
                "area",
                Some(polygon(&[lonlat!(0.0, 0.0), lonlat!(1.0, 1.0)])),
            )],
            ..Default::default()
        };

        let mut buffer = vec![];
        KmlWriter::new(&mut buffer)
            .with_geometry_insert(Some("    <extrude>1</extrude>".into()))
            .write_document(&document)
            .expect("written");
        let output = String::from_utf8(buffer).expect("utf8");

        assert!(output.contains("   <Polygon>\n    <extrude>1</extrude>\n    <outerBoundaryIs>\n"));
    }

    #[test]
    fn names_are_escaped() {
        let document = ExportDocument {
            title: "Fish & Game".into(),
            placemarks: vec![placemark("<A>", Some(Shape::Point(lonlat!(0.0, 0.0))))],
            ..Default::default()
        };

        let (output, _) = write(&document);
        assert!(output.contains("<name>Fish &amp; Game</name>"));
        assert!(output.contains("<name>&lt;A&gt;</name>"));
    }
}
