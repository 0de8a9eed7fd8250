#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ndarray::Array2;
use rico_dataset::annotation::normalize::ImageDims;
use rico_dataset::dataset::assembler::AssemblerConfig;
use rico_dataset::embedding::table::EmbeddingTable;
use serde_json::{Value, json};
use tempfile::TempDir;

/// A small RICO-shaped corpus on disk.
pub struct Corpus {
    pub root: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("combined")).unwrap();
        std::fs::create_dir_all(root.path().join("semantic_annotations")).unwrap();
        std::fs::create_dir_all(root.path().join("ui_layout_vectors")).unwrap();
        Self { root }
    }

    pub fn combined_dir(&self) -> PathBuf {
        self.root.path().join("combined")
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.root.path().join("semantic_annotations")
    }

    pub fn names_path(&self) -> PathBuf {
        self.root.path().join("ui_layout_vectors").join("ui_names.json")
    }

    pub fn vectors_path(&self) -> PathBuf {
        self.root.path().join("ui_layout_vectors").join("ui_vectors.npy")
    }

    /// Real JPEG so metadata can read its header.
    pub fn add_screenshot(&self, base: &str, width: u32, height: u32) -> PathBuf {
        let path = self.combined_dir().join(format!("{}.jpg", base));
        image::RgbImage::new(width, height).save(&path).unwrap();
        path
    }

    pub fn add_file(&self, rel: &str, content: &[u8]) -> PathBuf {
        let path = self.root.path().join(rel);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn add_annotation(&self, base: &str, tree: &Value) -> PathBuf {
        let path = self.annotations_dir().join(format!("{}.json", base));
        std::fs::write(&path, serde_json::to_string(tree).unwrap()).unwrap();
        path
    }

    pub fn add_mask(&self, base: &str) -> PathBuf {
        let path = self.annotations_dir().join(format!("{}.png", base));
        image::RgbImage::new(2, 2).save(&path).unwrap();
        path
    }

    /// Write the name list and a 64-wide matrix whose row `i` is filled with `i`.
    pub fn write_table(&self, names: &[&str]) {
        let list: Vec<&str> = names.to_vec();
        std::fs::write(
            self.names_path(),
            serde_json::to_string(&json!({ "ui_names": list })).unwrap(),
        )
        .unwrap();

        let matrix = Array2::from_shape_fn((names.len(), 64), |(row, _)| row as f32);
        ndarray_npy::write_npy(self.vectors_path(), &matrix).unwrap();
    }

    pub fn load_table(&self) -> EmbeddingTable {
        EmbeddingTable::load(&self.names_path(), "ui_names", &self.vectors_path(), 64).unwrap()
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            combined_dir: self.combined_dir(),
            annotations_dir: self.annotations_dir(),
            screenshot_extensions: vec!["jpg".to_string()],
            table_extension: "png".to_string(),
            mask_extension: "png".to_string(),
            dims: ImageDims::default(),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }
}

/// Annotation file with a labeled root and a small nested tree.
pub fn sample_annotation() -> Value {
    json!({
        "bounds": [0, 0, 1440, 2560],
        "componentLabel": "Root",
        "class": "com.android.internal.policy.PhoneWindow$DecorView",
        "children": [
            {
                "bounds": [0, 0, 1440, 256],
                "componentLabel": "Toolbar",
                "class": "android.support.v7.widget.Toolbar",
                "children": [
                    {
                        "bounds": [144, 256, 288, 512],
                        "componentLabel": "Icon",
                        "iconClass": "arrow_backward",
                        "clickable": true,
                        "resource-id": "com.app:id/back",
                        "ancestors": ["android.widget.ImageButton"]
                    }
                ]
            },
            {
                "bounds": [0, 256, 1440, 512],
                "class": "android.widget.LinearLayout",
                "children": [
                    { "bounds": [0, 256, 720, 512], "componentLabel": "Text", "text": "hello" }
                ]
            }
        ]
    })
}
