//! Package assembly: slides, fixed parts, relationships, and media,
//! zipped into the final .pptx buffer.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use log::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use clipdeck_core::{Error, Page, Result, SectionTarget};

use crate::shapes::esc;
use crate::Branding;
use crate::slide::{build_slide, BuiltSlide, Relationship, SlideContext};
use crate::templates::{
    APP_PROPS, CORE_PROPS, NS_A, NS_P, NS_R, PACKAGE_RELS, REL_SLIDE, REL_SLIDE_MASTER,
    SLIDE_LAYOUT, SLIDE_LAYOUT_RELS, SLIDE_MASTER, SLIDE_MASTER_RELS, THEME,
};

/// Render the page sequence into a complete .pptx byte buffer.
///
/// Slides come out in page order; footer numbers are the final
/// 1-based positions. Index navigation is resolved here against that
/// final order.
pub fn render_deck(pages: &[Page], branding: &Branding) -> Result<Vec<u8>> {
    let mut media: Vec<(String, Vec<u8>)> = Vec::new();
    let icon_target = branding.icon_png.as_deref().map(|b| add_media(&mut media, b));
    let banner_target = branding
        .banner_png
        .as_deref()
        .map(|b| add_media(&mut media, b));
    let chart_target = pages.iter().find_map(|p| match p {
        Page::Overview {
            chart_png: Some(bytes),
            ..
        } => Some(add_media(&mut media, bytes)),
        _ => None,
    });

    let section_slides = section_slide_numbers(pages);

    let slides: Vec<BuiltSlide> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let ctx = SlideContext {
                icon_target: icon_target.as_deref(),
                banner_target: banner_target.as_deref(),
                chart_target: chart_target.as_deref(),
                section_slides: &section_slides,
                slide_number: i + 1,
            };
            build_slide(page, &ctx)
        })
        .collect();

    debug!(
        "packaging {} slides and {} media parts",
        slides.len(),
        media.len()
    );
    write_package(&slides, &media)
}

/// Register one media part and return its slide-relative target.
fn add_media(media: &mut Vec<(String, Vec<u8>)>, bytes: &[u8]) -> String {
    let name = format!("image{}.png", media.len() + 1);
    media.push((name.clone(), bytes.to_vec()));
    format!("../media/{name}")
}

/// Final 1-based slide position of the overview and of each section's
/// title slide.
fn section_slide_numbers(pages: &[Page]) -> HashMap<SectionTarget, usize> {
    let mut map = HashMap::new();
    for (i, page) in pages.iter().enumerate() {
        match page {
            Page::Overview { .. } => {
                map.entry(SectionTarget::Overview).or_insert(i + 1);
            }
            Page::SectionIntro { category, .. } => {
                map.entry(SectionTarget::Category(category.clone()))
                    .or_insert(i + 1);
            }
            _ => {}
        }
    }
    map
}

fn write_package(slides: &[BuiltSlide], media: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    write_part(&mut zip, options, "[Content_Types].xml", content_types(slides.len()).as_bytes())?;
    write_part(&mut zip, options, "_rels/.rels", PACKAGE_RELS.as_bytes())?;
    write_part(&mut zip, options, "docProps/core.xml", CORE_PROPS.as_bytes())?;
    write_part(&mut zip, options, "docProps/app.xml", APP_PROPS.as_bytes())?;
    write_part(&mut zip, options, "ppt/presentation.xml", presentation_xml(slides.len()).as_bytes())?;
    write_part(
        &mut zip,
        options,
        "ppt/_rels/presentation.xml.rels",
        presentation_rels(slides.len()).as_bytes(),
    )?;
    write_part(&mut zip, options, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    write_part(
        &mut zip,
        options,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        SLIDE_MASTER_RELS.as_bytes(),
    )?;
    write_part(&mut zip, options, "ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    write_part(
        &mut zip,
        options,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        SLIDE_LAYOUT_RELS.as_bytes(),
    )?;
    write_part(&mut zip, options, "ppt/theme/theme1.xml", THEME.as_bytes())?;

    for (i, slide) in slides.iter().enumerate() {
        let number = i + 1;
        write_part(
            &mut zip,
            options,
            &format!("ppt/slides/slide{number}.xml"),
            slide.xml.as_bytes(),
        )?;
        write_part(
            &mut zip,
            options,
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            rels_xml(&slide.rels).as_bytes(),
        )?;
    }

    for (name, bytes) in media {
        write_part(&mut zip, options, &format!("ppt/media/{name}"), bytes)?;
    }

    let cursor = zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn write_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    path: &str,
    bytes: &[u8],
) -> Result<()> {
    zip.start_file(path, options)
        .map_err(|e| Error::ZipError(e.to_string()))?;
    zip.write_all(bytes)?;
    Ok(())
}

fn content_types(slide_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{overrides}</Types>"#
    )
}

fn presentation_xml(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 0..slide_count {
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            2 + i
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![Relationship {
        id: "rId1".to_string(),
        rel_type: REL_SLIDE_MASTER,
        target: "slideMasters/slideMaster1.xml".to_string(),
        external: false,
    }];
    for i in 0..slide_count {
        rels.push(Relationship {
            id: format!("rId{}", 2 + i),
            rel_type: REL_SLIDE,
            target: format!("slides/slide{}.xml", i + 1),
            external: false,
        });
    }
    rels_xml(&rels)
}

fn rels_xml(rels: &[Relationship]) -> String {
    let entries: String = rels
        .iter()
        .map(|r| {
            let mode = if r.external {
                r#" TargetMode="External""#
            } else {
                ""
            };
            format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                r.id,
                r.rel_type,
                esc(&r.target),
                mode
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{entries}</Relationships>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clipdeck_core::{build_outline, Clipping, ReportConfig};
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_outline(chart: Option<Vec<u8>>) -> Vec<Page> {
        let config = ReportConfig::default();
        let clippings = vec![
            Clipping {
                title: "Notícia A".into(),
                primary_topic: Some("Eventos".into()),
                published: NaiveDate::from_ymd_opt(2024, 5, 2),
                circulation: 1000,
                link: Some("https://example.com/a".into()),
                ..Clipping::default()
            },
            Clipping {
                title: "Notícia B".into(),
                primary_topic: Some("Academia".into()),
                published: NaiveDate::from_ymd_opt(2024, 5, 1),
                circulation: 500,
                ..Clipping::default()
            },
        ];
        build_outline(&config, clippings, chart).pages
    }

    fn unzip(bytes: &[u8]) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes.to_vec())).expect("valid zip")
    }

    fn part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("missing part {name}"))
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn package_has_one_slide_per_page() {
        let pages = sample_outline(None);
        let deck = render_deck(&pages, &Branding::none()).unwrap();
        let mut archive = unzip(&deck);

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
        ] {
            part(&mut archive, name);
        }
        for i in 1..=pages.len() {
            part(&mut archive, &format!("ppt/slides/slide{i}.xml"));
            part(&mut archive, &format!("ppt/slides/_rels/slide{i}.xml.rels"));
        }
        let presentation = part(&mut archive, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), pages.len());
    }

    #[test]
    fn index_prints_pre_splice_numbers_but_links_post_splice() {
        // Pages: cover, index, overview, Eventos intro+table,
        // Academia intro+table, closing.
        let pages = sample_outline(None);
        let deck = render_deck(&pages, &Branding::none()).unwrap();
        let mut archive = unzip(&deck);

        let index = part(&mut archive, "ppt/slides/slide2.xml");
        // The overview leader line still says page 2...
        assert!(index.contains("Overview"));
        assert!(index.contains("..2</a:t>"));

        // ...but the overview slide actually sits at position 3 and
        // says so in its footer.
        let overview = part(&mut archive, "ppt/slides/slide3.xml");
        assert!(overview.contains("<a:t>3</a:t>"));

        // The index entry's jump resolves to the real slide.
        let index_rels = part(&mut archive, "ppt/slides/_rels/slide2.xml.rels");
        assert!(index_rels.contains(r#"Target="slide3.xml""#));
        assert!(index_rels.contains(r#"Target="slide4.xml""#));
    }

    #[test]
    fn title_links_are_external_relationships() {
        let pages = sample_outline(None);
        let deck = render_deck(&pages, &Branding::none()).unwrap();
        let mut archive = unzip(&deck);

        // Eventos table is slide 5 (cover, index, overview, intro, table).
        let rels = part(&mut archive, "ppt/slides/_rels/slide5.xml.rels");
        assert!(rels.contains(r#"Target="https://example.com/a" TargetMode="External""#));
    }

    #[test]
    fn chart_bytes_become_a_media_part() {
        let chart = vec![0x89, b'P', b'N', b'G'];
        let pages = sample_outline(Some(chart.clone()));
        let deck = render_deck(&pages, &Branding::none()).unwrap();
        let mut archive = unzip(&deck);

        let mut media = Vec::new();
        archive
            .by_name("ppt/media/image1.png")
            .expect("chart media part")
            .read_to_end(&mut media)
            .unwrap();
        assert_eq!(media, chart);

        let overview = part(&mut archive, "ppt/slides/slide3.xml");
        assert!(overview.contains("<a:blip r:embed="));
    }

    #[test]
    fn branding_images_land_on_the_right_slides() {
        let pages = sample_outline(None);
        let branding = Branding {
            icon_png: Some(vec![1]),
            banner_png: Some(vec![2]),
        };
        let deck = render_deck(&pages, &branding).unwrap();
        let mut archive = unzip(&deck);

        part(&mut archive, "ppt/media/image1.png");
        part(&mut archive, "ppt/media/image2.png");

        // The cover carries banner and icon, a table slide only the icon.
        let cover_rels = part(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert_eq!(cover_rels.matches("media/image").count(), 2);
        let table_rels = part(&mut archive, "ppt/slides/_rels/slide5.xml.rels");
        assert_eq!(table_rels.matches("media/image1.png").count(), 1);
        assert_eq!(table_rels.matches("media/image2.png").count(), 0);
    }
}
