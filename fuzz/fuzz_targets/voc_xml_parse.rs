//! Feeds arbitrary bytes to VOC extraction and, when a document comes out,
//! pushes every present box through the normalizer.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vockit::ir::io_voc_xml::from_voc_xml_slice;
use vockit::ir::{normalize, XmlField};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(doc) = from_voc_xml_slice(data) else {
        return;
    };

    let (width, height) = match doc.declared_size {
        XmlField::Present(dims) => dims,
        _ => (640, 480),
    };
    for object in &doc.objects {
        if let XmlField::Present(raw) = object.bndbox {
            if let Ok(bbox) = normalize(raw, width, height) {
                assert!(bbox.width() > 0 && bbox.height() > 0);
            }
        }
    }
});
