//! Integration tests for the upload, read, and analyze pipeline
//!
//! Tests:
//! 1. Saving uploads into a session directory
//! 2. Reading every page of a multi-page PDF
//! 3. Session isolation between storage roots
//! 4. Analysis of extracted text with a scripted model
//! 5. Model loading from a YAML file

use async_trait::async_trait;
use docportal_core::config::Config;
use docportal_core::logging::{Level, MemorySink};
use docportal_core::{
    ChatClient, ChatMessage, CredentialSet, DocPortalError, DocumentAnalyzer, DocumentHandler,
    ModelLoader, Result, UploadedFile,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Write a PDF with one line of text per page
fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn handler(root: &TempDir, session: &str) -> DocumentHandler {
    DocumentHandler::new(
        Some(root.path().to_path_buf()),
        Some(session.to_string()),
        MemorySink::new(),
    )
    .unwrap()
}

#[test]
fn test_save_then_read_all_pages() {
    let scratch = TempDir::new().unwrap();
    let source = scratch.path().join("report.pdf");
    write_pdf(&source, &["Alpha page", "Beta page", "Gamma page"]);

    let root = TempDir::new().unwrap();
    let handler = handler(&root, "session_a");
    let saved = handler.save(&UploadedFile::from_path(&source).unwrap()).unwrap();
    assert_eq!(saved, handler.session_path().join("report.pdf"));

    let text = handler.read_text(&saved).unwrap();
    let markers: Vec<usize> = ["--- Page 1 ---", "--- Page 2 ---", "--- Page 3 ---"]
        .iter()
        .map(|m| text.find(m).unwrap_or_else(|| panic!("{m} missing from {text:?}")))
        .collect();
    assert!(markers.windows(2).all(|w| w[0] < w[1]));
    assert!(!text.contains("--- Page 4 ---"));

    let alpha = text.find("Alpha").unwrap();
    let beta = text.find("Beta").unwrap();
    let gamma = text.find("Gamma").unwrap();
    assert!(markers[0] < alpha && alpha < markers[1]);
    assert!(markers[1] < beta && beta < markers[2]);
    assert!(markers[2] < gamma);
}

#[test]
fn test_extension_check_is_case_insensitive() {
    let root = TempDir::new().unwrap();
    let handler = handler(&root, "session_b");

    assert!(handler
        .save(&UploadedFile::new("report.PDF", b"%PDF-1.5".to_vec()))
        .is_ok());

    let err = handler
        .save(&UploadedFile::new("report.txt", b"text".to_vec()))
        .unwrap_err();
    assert!(matches!(err, DocPortalError::InvalidFormat(_)));
    assert!(!handler.session_path().join("report.txt").exists());
}

#[test]
fn test_sessions_are_isolated_per_root() {
    let root_a = TempDir::new().unwrap();
    let root_b = TempDir::new().unwrap();
    let a = handler(&root_a, "shared_id");
    let b = handler(&root_b, "shared_id");

    assert_ne!(a.session_path(), b.session_path());
    a.save(&UploadedFile::new("only_a.pdf", b"%PDF".to_vec()))
        .unwrap();
    assert!(!b.session_path().join("only_a.pdf").exists());

    // Reopening an existing session keeps its files
    let again = handler(&root_a, "shared_id");
    assert_eq!(again.session_path(), a.session_path());
    assert!(again.session_path().join("only_a.pdf").exists());
}

#[test]
fn test_read_missing_file() {
    let root = TempDir::new().unwrap();
    let handler = handler(&root, "session_c");
    let err = handler
        .read_text(handler.session_path().join("absent.pdf"))
        .unwrap_err();
    assert!(matches!(err, DocPortalError::Read { .. }));
}

struct CannedChat {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatClient for CannedChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        for message in messages {
            self.prompts.lock().unwrap().push(message.content);
        }
        Ok(self.reply.clone())
    }

    fn provider(&self) -> &'static str {
        "canned"
    }

    fn model_name(&self) -> &str {
        "canned-1"
    }

    fn temperature(&self) -> f32 {
        0.0
    }

    fn max_output_tokens(&self) -> Option<u32> {
        None
    }
}

#[tokio::test]
async fn test_analyze_extracted_text() {
    let scratch = TempDir::new().unwrap();
    let pdf = scratch.path().join("paper.pdf");
    write_pdf(&pdf, &["Transformers", "Attention"]);

    let root = TempDir::new().unwrap();
    let text = handler(&root, "session_d").read_text(&pdf).unwrap();

    let client = Arc::new(CannedChat {
        reply: r#"{"Summary": ["Two pages"], "Title": "Transformers", "Author": ["Not Available"], "DateCreated": "Not Available", "LastModifiedDate": "Not Available", "Publisher": "Not Available", "Language": "English", "PageCount": 2, "SentimentTone": "Neutral"}"#.to_string(),
        prompts: Mutex::new(Vec::new()),
    });
    let sink = MemorySink::new();
    let analyzer = DocumentAnalyzer::new(client.clone(), sink.clone()).unwrap();

    let metadata = analyzer.analyze(&text).await.unwrap();
    assert_eq!(metadata.title, "Transformers");
    assert_eq!(metadata.page_count.to_string(), "2");

    let prompts = client.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("--- Page 2 ---"));
    assert!(sink.at(Level::Error).is_empty());
}

#[tokio::test]
async fn test_analyze_empty_text() {
    let client = Arc::new(CannedChat {
        reply: String::new(),
        prompts: Mutex::new(Vec::new()),
    });
    let analyzer = DocumentAnalyzer::new(client.clone(), MemorySink::new()).unwrap();

    let err = analyzer.analyze("").await.unwrap_err();
    assert!(matches!(err, DocPortalError::Analysis { .. }));
    assert!(client.prompts.lock().unwrap().is_empty());
}

#[test]
fn test_loader_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        r#"
embedding_model:
  provider: "huggingface"
  model_name: "sentence-transformers/all-MiniLM-L6-v2"
llm:
  groq:
    provider: "groq"
    model_name: "deepseek-r1-distill-llama-70b"
    temperature: 0
    max_output_tokens: 2048
  google:
    provider: "google"
    model_name: "gemini-2.0-flash"
    temperature: 0
    max_output_tokens: 2048
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    let credentials = CredentialSet::from_pairs([
        ("GROQ_API_KEY", "gsk_test"),
        ("HF_TOKEN", "hf_test"),
        ("GOOGLE_API_KEY", "g_test"),
    ]);

    for (key, model) in [
        ("groq", "deepseek-r1-distill-llama-70b"),
        ("google", "gemini-2.0-flash"),
    ] {
        let llm = ModelLoader::new(config.clone(), credentials.clone())
            .with_provider_key(key)
            .load_llm()
            .unwrap();
        assert_eq!(llm.provider(), key);
        assert_eq!(llm.model_name(), model);
        assert_eq!(llm.temperature(), 0.0);
    }

    let err = ModelLoader::new(config, credentials)
        .with_provider_key("openai")
        .load_llm()
        .err()
        .unwrap();
    assert!(matches!(err, DocPortalError::UnsupportedProvider(_)));
}
