//! VRT (GDAL virtual raster) output.

use crate::compose::BandSourceDescriptor;
use crate::error::{MosaicError, Result};
use log::info;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

/// One zone's mosaic: all bands declared on the 10m grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicDataset {
    pub output_path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub projection: String,
    pub geo_transform: [f64; 6],
    pub bands: Vec<BandSourceDescriptor>,
}

fn start<'a>(name: &'a str, attributes: &[(&'a str, &'a str)]) -> Event<'a> {
    Event::Start(BytesStart::new(name).with_attributes(attributes.iter().copied()))
}

fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn format_geo_transform(gt: &[f64; 6]) -> String {
    gt.iter()
        .map(|v| format!("{:.16e}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Data types a VRTRasterBand can declare
fn is_known_data_type(name: &str) -> bool {
    !name.is_empty() && name != "Unknown"
}

impl MosaicDataset {
    /// Serialize to VRT XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        let width = self.width.to_string();
        let height = self.height.to_string();
        writer.write_event(start(
            "VRTDataset",
            &[("rasterXSize", width.as_str()), ("rasterYSize", height.as_str())],
        ))?;
        text_element(&mut writer, "SRS", &self.projection)?;
        text_element(&mut writer, "GeoTransform", &format_geo_transform(&self.geo_transform))?;

        for (slot, band) in self.bands.iter().enumerate() {
            if !is_known_data_type(&band.source_data_type) {
                return Err(MosaicError::BandAttach {
                    slot,
                    reason: format!("unknown data type {:?}", band.source_data_type),
                });
            }
            write_band(&mut writer, slot + 1, band)?;
        }

        writer.write_event(Event::End(BytesEnd::new("VRTDataset")))?;

        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the VRT file to `output_path`.
    pub fn write(&self) -> Result<()> {
        let xml = self.to_xml()?;
        fs::write(&self.output_path, xml)?;
        info!(
            "Wrote {} bands ({}x{}) to {}",
            self.bands.len(),
            self.width,
            self.height,
            self.output_path.display()
        );
        Ok(())
    }
}

fn write_band<W: std::io::Write>(
    writer: &mut Writer<W>,
    index: usize,
    band: &BandSourceDescriptor,
) -> Result<()> {
    let index = index.to_string();
    let source_band = band.source_band.to_string();
    let source_width = band.source_width.to_string();
    let source_height = band.source_height.to_string();
    let dest_width = band.dest_width.to_string();
    let dest_height = band.dest_height.to_string();

    writer.write_event(start(
        "VRTRasterBand",
        &[("dataType", band.source_data_type.as_str()), ("band", index.as_str())],
    ))?;
    text_element(writer, "Description", band.description)?;

    writer.write_event(start("SimpleSource", &[("resampling", band.resampling)]))?;
    writer.write_event(start("SourceFilename", &[("relativeToVRT", "0")]))?;
    writer.write_event(Event::Text(BytesText::new(&band.source_file)))?;
    writer.write_event(Event::End(BytesEnd::new("SourceFilename")))?;
    text_element(writer, "SourceBand", &source_band)?;
    writer.write_event(Event::Empty(BytesStart::new("SourceProperties").with_attributes([
        ("RasterXSize", source_width.as_str()),
        ("RasterYSize", source_height.as_str()),
        ("DataType", band.source_data_type.as_str()),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("SrcRect").with_attributes([
        ("xOff", "0"),
        ("yOff", "0"),
        ("xSize", source_width.as_str()),
        ("ySize", source_height.as_str()),
    ])))?;
    writer.write_event(Event::Empty(BytesStart::new("DstRect").with_attributes([
        ("xOff", "0"),
        ("yOff", "0"),
        ("xSize", dest_width.as_str()),
        ("ySize", dest_height.as_str()),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("SimpleSource")))?;

    writer.write_event(Event::End(BytesEnd::new("VRTRasterBand")))?;
    Ok(())
}
