//! Minimal OPC package writer producing `.pptx` files.
//!
//! Emits just enough of the PresentationML part graph for PowerPoint and
//! LibreOffice to open the deck: content types, package rels, presentation,
//! one blank master/layout/theme, one slide part per page, and media parts
//! for attached images. XML is assembled as strings, ZIP-packed with deflate
//! for parts and no compression for media.

use crate::core::template::{Alignment, TemplateStyle};
use crate::error::Result;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

const EMU_PER_INCH: f64 = 914_400.0;

/// 16:9 canvas, 10 by 5.625 inches.
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    Title,
    Content,
}

#[derive(Debug, Clone)]
struct Page {
    kind: PageKind,
    heading: String,
    bullets: Vec<String>,
    image: Option<usize>,
    style: TemplateStyle,
}

/// Builder for one presentation file.
pub struct PptxWriter {
    title: String,
    pages: Vec<Page>,
    media: Vec<Vec<u8>>,
}

impl PptxWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Centered heading page with an optional image below it.
    pub fn add_title_page(&mut self, heading: &str, image: Option<Vec<u8>>, style: TemplateStyle) {
        let image = image.map(|data| self.add_media(data));
        self.pages.push(Page {
            kind: PageKind::Title,
            heading: heading.to_string(),
            bullets: Vec::new(),
            image,
            style,
        });
    }

    /// Heading plus bulleted body lines, with an optional image between them.
    pub fn add_content_page(
        &mut self,
        heading: &str,
        bullets: Vec<String>,
        image: Option<Vec<u8>>,
        style: TemplateStyle,
    ) {
        let image = image.map(|data| self.add_media(data));
        self.pages.push(Page {
            kind: PageKind::Content,
            heading: heading.to_string(),
            bullets,
            image,
            style,
        });
    }

    fn add_media(&mut self, data: Vec<u8>) -> usize {
        self.media.push(data);
        self.media.len() - 1
    }

    fn media_name(&self, index: usize) -> String {
        format!("image{}.{}", index + 1, image_extension(&self.media[index]))
    }

    /// Serialize the package to ZIP bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let xml_options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let media_options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", xml_options)?;
        zip.write_all(self.content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", xml_options)?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;

        zip.start_file("docProps/core.xml", xml_options)?;
        zip.write_all(self.core_props_xml().as_bytes())?;

        zip.start_file("docProps/app.xml", xml_options)?;
        zip.write_all(self.app_props_xml().as_bytes())?;

        zip.start_file("ppt/presentation.xml", xml_options)?;
        zip.write_all(self.presentation_xml().as_bytes())?;

        zip.start_file("ppt/_rels/presentation.xml.rels", xml_options)?;
        zip.write_all(self.presentation_rels_xml().as_bytes())?;

        zip.start_file("ppt/slideMasters/slideMaster1.xml", xml_options)?;
        zip.write_all(SLIDE_MASTER_XML.as_bytes())?;

        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", xml_options)?;
        zip.write_all(SLIDE_MASTER_RELS_XML.as_bytes())?;

        zip.start_file("ppt/slideLayouts/slideLayout1.xml", xml_options)?;
        zip.write_all(SLIDE_LAYOUT_XML.as_bytes())?;

        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", xml_options)?;
        zip.write_all(SLIDE_LAYOUT_RELS_XML.as_bytes())?;

        zip.start_file("ppt/theme/theme1.xml", xml_options)?;
        zip.write_all(THEME_XML.as_bytes())?;

        for (index, page) in self.pages.iter().enumerate() {
            zip.start_file(format!("ppt/slides/slide{}.xml", index + 1), xml_options)?;
            zip.write_all(self.slide_xml(page).as_bytes())?;

            zip.start_file(
                format!("ppt/slides/_rels/slide{}.xml.rels", index + 1),
                xml_options,
            )?;
            zip.write_all(self.slide_rels_xml(page).as_bytes())?;
        }

        for (index, data) in self.media.iter().enumerate() {
            zip.start_file(format!("ppt/media/{}", self.media_name(index)), media_options)?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
        xml.push_str(r#"<Default Extension="gif" ContentType="image/gif"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
        xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
        for index in 0..self.pages.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                index + 1
            ));
        }
        xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
        xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
        xml.push_str("</Types>");
        xml
    }

    fn presentation_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");
        if !self.pages.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for index in 0..self.pages.len() {
                // Slide ids start at 256, rels at rId2 behind the master.
                xml.push_str(&format!(
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    256 + index,
                    index + 2
                ));
            }
            xml.push_str("</p:sldIdLst>");
        }
        xml.push_str(&format!(
            r#"<p:sldSz cx="{SLIDE_WIDTH_EMU}" cy="{SLIDE_HEIGHT_EMU}"/>"#
        ));
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");
        xml
    }

    fn presentation_rels_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#);
        for index in 0..self.pages.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                index + 2,
                index + 1
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn slide_xml(&self, page: &Page) -> String {
        let style = &page.style;
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld>");
        xml.push_str(&format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            style.background
        ));
        xml.push_str("<p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        match page.kind {
            PageKind::Title => {
                // Heading centered in the upper half, image below.
                self.push_text_shape(
                    &mut xml,
                    2,
                    "Title",
                    &page.heading,
                    TextBox {
                        x: emu(0.5),
                        y: emu(1.0),
                        cx: emu(9.0),
                        cy: emu(1.0),
                        size: 4400,
                        bold: true,
                        color: style.title_color,
                        align: "ctr",
                        line_spacing: None,
                        bullets: false,
                    },
                );
                if page.image.is_some() {
                    self.push_picture(&mut xml, 3, emu(0.5), emu(2.0), emu(8.0), emu(4.0));
                }
            }
            PageKind::Content => {
                let align = match style.alignment {
                    Alignment::Left => "l",
                    Alignment::Center => "ctr",
                };
                self.push_text_shape(
                    &mut xml,
                    2,
                    "Heading",
                    &page.heading,
                    TextBox {
                        x: emu(0.5),
                        y: emu(0.3),
                        cx: emu(9.0),
                        cy: emu(0.5),
                        size: 3200,
                        bold: true,
                        color: style.heading_color,
                        align,
                        line_spacing: None,
                        bullets: false,
                    },
                );

                let mut next_id = 3;
                if page.image.is_some() {
                    self.push_picture(&mut xml, next_id, emu(0.5), emu(1.2), emu(8.0), emu(3.5));
                    next_id += 1;
                }

                // The body drops below the image when one is present.
                let (body_y, body_cy) = if page.image.is_some() {
                    (emu(4.8), emu(0.75))
                } else {
                    (emu(1.2), emu(2.25))
                };
                self.push_bullet_shape(
                    &mut xml,
                    next_id,
                    &page.bullets,
                    TextBox {
                        x: emu(0.5),
                        y: body_y,
                        cx: emu(9.0),
                        cy: body_cy,
                        size: style.font_size * 100,
                        bold: false,
                        color: style.color,
                        align,
                        line_spacing: Some(style.line_spacing),
                        bullets: true,
                    },
                );
            }
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");
        xml
    }

    fn push_text_shape(&self, xml: &mut String, id: u32, name: &str, text: &str, frame: TextBox) {
        xml.push_str("<p:sp>");
        xml.push_str(&format!(
            r#"<p:nvSpPr><p:cNvPr id="{id}" name="{name} {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#
        ));
        xml.push_str(&frame.sp_pr());
        xml.push_str("<p:txBody>");
        xml.push_str(r#"<a:bodyPr wrap="square" anchor="t"/><a:lstStyle/>"#);
        xml.push_str("<a:p>");
        xml.push_str(&format!(r#"<a:pPr algn="{}"/>"#, frame.align));
        xml.push_str(&frame.run(text));
        xml.push_str("</a:p>");
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");
    }

    fn push_bullet_shape(&self, xml: &mut String, id: u32, lines: &[String], frame: TextBox) {
        xml.push_str("<p:sp>");
        xml.push_str(&format!(
            r#"<p:nvSpPr><p:cNvPr id="{id}" name="Body {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#
        ));
        xml.push_str(&frame.sp_pr());
        xml.push_str("<p:txBody>");
        xml.push_str(r#"<a:bodyPr wrap="square" anchor="t"/><a:lstStyle/>"#);
        if lines.is_empty() {
            // A text body requires at least one paragraph.
            xml.push_str("<a:p/>");
        }
        for line in lines {
            xml.push_str("<a:p>");
            xml.push_str(&frame.bullet_p_pr());
            xml.push_str(&frame.run(line));
            xml.push_str("</a:p>");
        }
        xml.push_str("</p:txBody>");
        xml.push_str("</p:sp>");
    }

    fn push_picture(&self, xml: &mut String, id: u32, x: i64, y: i64, cx: i64, cy: i64) {
        xml.push_str("<p:pic>");
        xml.push_str(&format!(
            r#"<p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>"#
        ));
        // The image relationship is always rId2 in the slide's rels.
        xml.push_str(r#"<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#);
        xml.push_str(&format!(
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#
        ));
        xml.push_str("</p:pic>");
    }

    fn slide_rels_xml(&self, page: &Page) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#);
        if let Some(media_index) = page.image {
            xml.push_str(&format!(
                r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/{}"/>"#,
                self.media_name(media_index)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    fn core_props_xml(&self) -> String {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{title}</dc:title>",
                "<dc:creator>deckgen</dc:creator>",
                "<cp:lastModifiedBy>deckgen</cp:lastModifiedBy>",
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>"#,
                r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>"#,
                "</cp:coreProperties>"
            ),
            title = html_escape::encode_text(&self.title),
            now = now
        )
    }

    fn app_props_xml(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
                r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
                "<Application>deckgen</Application>",
                "<Slides>{count}</Slides>",
                "</Properties>"
            ),
            count = self.pages.len()
        )
    }
}

/// Geometry and run styling for one text frame.
struct TextBox {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    /// Font size in hundredths of a point.
    size: u32,
    bold: bool,
    color: &'static str,
    align: &'static str,
    line_spacing: Option<f32>,
    bullets: bool,
}

impl TextBox {
    fn sp_pr(&self) -> String {
        format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            self.x, self.y, self.cx, self.cy
        )
    }

    fn bullet_p_pr(&self) -> String {
        let spacing = self
            .line_spacing
            .map(|factor| {
                format!(
                    r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#,
                    (factor * 100_000.0).round() as i64
                )
            })
            .unwrap_or_default();
        let marker = if self.bullets {
            r#"<a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#
        } else {
            ""
        };
        format!(
            r#"<a:pPr marL="342900" indent="-342900" algn="{}">{spacing}{marker}</a:pPr>"#,
            self.align
        )
    }

    fn run(&self, text: &str) -> String {
        let bold = if self.bold { r#" b="1""# } else { "" };
        format!(
            r#"<a:r><a:rPr lang="en-US" sz="{}"{} dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
            self.size,
            bold,
            self.color,
            html_escape::encode_text(text)
        )
    }
}

fn image_extension(data: &[u8]) -> &'static str {
    if data.starts_with(&[0xFF, 0xD8]) {
        "jpeg"
    } else if data.starts_with(b"GIF8") {
        "gif"
    } else {
        "png"
    }
}

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    "</Relationships>"
);

const SLIDE_MASTER_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    "<p:cSld>",
    r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
    "<p:spTree>",
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    "</p:spTree>",
    "</p:cSld>",
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
    "<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>",
    "</p:sldMaster>"
);

const SLIDE_MASTER_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>"#,
    "</Relationships>"
);

const SLIDE_LAYOUT_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">"#,
    r#"<p:cSld name="Blank">"#,
    "<p:spTree>",
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    "</p:spTree>",
    "</p:cSld>",
    r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#,
    "</p:sldLayout>"
);

const SLIDE_LAYOUT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
    "</Relationships>"
);

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#,
    "<a:themeElements>",
    r#"<a:clrScheme name="Office">"#,
    r#"<a:dk1><a:srgbClr val="000000"/></a:dk1>"#,
    r#"<a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#,
    r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4472C4"/></a:accent1>"#,
    r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#,
    r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#,
    r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#,
    r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#,
    "</a:clrScheme>",
    r#"<a:fontScheme name="Office">"#,
    r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    "</a:fontScheme>",
    r#"<a:fmtScheme name="Office">"#,
    "<a:fillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="50000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="75000"/></a:schemeClr></a:solidFill>"#,
    "</a:fillStyleLst>",
    "<a:lnStyleLst>",
    r#"<a:ln w="9525" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="25400" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    r#"<a:ln w="38100" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
    "</a:lnStyleLst>",
    "<a:effectStyleLst>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "<a:effectStyle><a:effectLst/></a:effectStyle>",
    "</a:effectStyleLst>",
    "<a:bgFillStyleLst>",
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:tint val="95000"/></a:schemeClr></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"><a:shade val="90000"/></a:schemeClr></a:solidFill>"#,
    "</a:bgFillStyleLst>",
    "</a:fmtScheme>",
    "</a:themeElements>",
    "<a:objectDefaults/>",
    "<a:extraClrSchemeLst/>",
    "</a:theme>"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::template;
    use std::io::Read;

    fn read_part(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
        let mut part = archive.by_name(name).expect("part present");
        let mut content = String::new();
        part.read_to_string(&mut content).expect("read part");
        content
    }

    fn style() -> TemplateStyle {
        template::style_for(template::DEFAULT_TEMPLATE)
    }

    #[test]
    fn empty_package_is_a_zip() {
        let bytes = PptxWriter::new("empty").to_bytes().expect("bytes");
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);
    }

    #[test]
    fn every_page_gets_a_slide_part() {
        let mut writer = PptxWriter::new("demo");
        writer.add_title_page("Welcome", None, style());
        writer.add_content_page("Points", vec!["First.".to_string()], None, style());

        let bytes = writer.to_bytes().expect("bytes");
        let presentation = read_part(bytes.clone(), "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 2);

        let types = read_part(bytes.clone(), "[Content_Types].xml");
        assert!(types.contains("/ppt/slides/slide1.xml"));
        assert!(types.contains("/ppt/slides/slide2.xml"));

        read_part(bytes, "ppt/slides/slide2.xml");
    }

    #[test]
    fn slide_xml_carries_heading_and_bullets() {
        let mut writer = PptxWriter::new("demo");
        writer.add_content_page(
            "Heading (1/2)",
            vec!["First point.".to_string(), "Second point.".to_string()],
            None,
            style(),
        );

        let slide = read_part(writer.to_bytes().expect("bytes"), "ppt/slides/slide1.xml");
        assert!(slide.contains("Heading (1/2)"));
        assert!(slide.contains("First point."));
        assert!(slide.contains("Second point."));
        assert!(slide.contains(r#"sz="1800""#));
        assert!(slide.contains(r#"<a:srgbClr val="666666"/>"#));
        assert!(slide.contains(r#"val="120000""#));
    }

    #[test]
    fn heading_text_is_escaped() {
        let mut writer = PptxWriter::new("demo");
        writer.add_content_page("Q&A <live>", vec!["x.".to_string()], None, style());

        let slide = read_part(writer.to_bytes().expect("bytes"), "ppt/slides/slide1.xml");
        assert!(slide.contains("Q&amp;A"));
        assert!(slide.contains("&lt;live"));
        assert!(!slide.contains("<live>"));
    }

    #[test]
    fn image_lands_in_media_with_relationship() {
        let png = b"\x89PNG\r\n\x1a\nfake".to_vec();
        let mut writer = PptxWriter::new("demo");
        writer.add_title_page("Cover", Some(png), style());

        let bytes = writer.to_bytes().expect("bytes");
        let rels = read_part(bytes.clone(), "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../media/image1.png"));

        let slide = read_part(bytes.clone(), "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"r:embed="rId2""#));

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open archive");
        assert!(archive.by_name("ppt/media/image1.png").is_ok());
    }

    #[test]
    fn jpeg_magic_gets_jpeg_extension() {
        assert_eq!(image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpeg");
        assert_eq!(image_extension(b"\x89PNG\r\n"), "png");
        assert_eq!(image_extension(b"GIF89a"), "gif");
    }

    #[test]
    fn dark_template_sets_background() {
        let mut writer = PptxWriter::new("demo");
        writer.add_content_page(
            "H",
            vec!["x.".to_string()],
            None,
            template::style_for("digital-domination"),
        );

        let slide = read_part(writer.to_bytes().expect("bytes"), "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"<a:srgbClr val="1A1A2E"/>"#));
        assert!(slide.contains(r#"algn="ctr""#));
    }
}
