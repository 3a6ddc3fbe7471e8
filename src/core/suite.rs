//! # Suite Declaration Module / 套件声明模块
//!
//! Reads and writes the XML suite declaration consumed by the test engine.
//!
//! Reading is a streaming scan driven by an explicit two-state machine:
//! `Outside` the requested suite, or `InsideTarget` while its entries are
//! collected. Collection stops at the suite's closing tag, so entries that
//! belong to other suites never leak in, and commented-out entries are never
//! seen because the reader reports them as comments.
//!
//! 读取和写入测试引擎使用的 XML 套件声明。
//! 读取过程是一个由显式双状态机驱动的流式扫描：位于目标套件之外（`Outside`），
//! 或在收集其条目时位于目标套件之内（`InsideTarget`）。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::collections::HashSet;
use std::path::Path;

use crate::core::error::ShardError;
use crate::core::models::{
    DeclarationRoot, SuiteDeclaration, SuiteDirectory, SuiteEntry, SuiteLookup,
};

/// File extension every suite declaration must carry.
/// 每个套件声明文件必须带有的扩展名。
pub const DECLARATION_EXTENSION: &str = "xml";

const SUITES_TAG: &str = "testsuites";
const SUITE_TAG: &str = "testsuite";
const DIRECTORY_TAG: &str = "directory";
const FILE_TAG: &str = "file";
const NAME_ATTR: &str = "name";
const SUFFIX_ATTR: &str = "suffix";

/// A `<directory>` element whose text has not been closed yet.
#[derive(Debug)]
struct PendingDirectory {
    suffix: Option<String>,
    text: String,
}

#[derive(Debug)]
enum ScanState {
    Outside,
    InsideTarget { pending: Option<PendingDirectory> },
}

/// Bookkeeping shared by both states of the scan.
struct Scanner<'a> {
    suite: &'a str,
    origin: &'a Path,
    root: Option<DeclarationRoot>,
    lookup: SuiteLookup,
    seen_suites: HashSet<String>,
    seen_directories: HashSet<String>,
}

impl Scanner<'_> {
    fn malformed(&self, reason: impl Into<String>) -> ShardError {
        ShardError::MalformedDeclaration {
            path: self.origin.to_path_buf(),
            reason: reason.into(),
        }
    }

    fn outside(&mut self, event: Event<'_>) -> Result<ScanState, ShardError> {
        let (element, has_body) = match event {
            Event::Start(element) => (element, true),
            Event::Empty(element) => (element, false),
            _ => return Ok(ScanState::Outside),
        };

        if self.root.is_none() {
            self.root = Some(read_root(&element).map_err(|err| self.malformed(err))?);
            return Ok(ScanState::Outside);
        }
        if element.local_name().as_ref() != SUITE_TAG.as_bytes() {
            return Ok(ScanState::Outside);
        }

        let name = attribute(&element, NAME_ATTR)
            .map_err(|err| self.malformed(err))?
            .ok_or_else(|| self.malformed("a <testsuite> has no name attribute"))?;
        if !self.seen_suites.insert(name.clone()) {
            return Err(self.malformed(format!("suite '{name}' is declared more than once")));
        }
        let is_target = name == self.suite;
        self.lookup.suites.push(name);

        if is_target && has_body {
            Ok(ScanState::InsideTarget { pending: None })
        } else {
            Ok(ScanState::Outside)
        }
    }

    fn inside(
        &mut self,
        mut pending: Option<PendingDirectory>,
        event: Event<'_>,
    ) -> Result<ScanState, ShardError> {
        let suite = self.suite;
        match event {
            Event::Start(element) => {
                let tag = element.local_name();
                if tag.as_ref() == SUITE_TAG.as_bytes() {
                    return Err(self.malformed(format!("suite '{suite}' contains a nested <testsuite>")));
                }
                if pending.is_some() {
                    return Err(self.malformed(format!(
                        "unexpected <{}> inside a <directory> of suite '{suite}'",
                        String::from_utf8_lossy(tag.as_ref())
                    )));
                }
                if tag.as_ref() == DIRECTORY_TAG.as_bytes() {
                    pending = Some(PendingDirectory {
                        suffix: attribute(&element, SUFFIX_ATTR).map_err(|err| self.malformed(err))?,
                        text: String::new(),
                    });
                }
            }
            Event::Empty(element) => {
                let tag = element.local_name();
                if tag.as_ref() == SUITE_TAG.as_bytes() {
                    return Err(self.malformed(format!("suite '{suite}' contains a nested <testsuite>")));
                }
                if tag.as_ref() == DIRECTORY_TAG.as_bytes() {
                    return Err(self.malformed(format!("suite '{suite}' has an empty <directory> entry")));
                }
            }
            Event::Text(text) => {
                if let Some(open) = pending.as_mut() {
                    let text = text.unescape().map_err(|err| self.malformed(err.to_string()))?;
                    open.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(open) = pending.as_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(element) => {
                let tag = element.local_name();
                if tag.as_ref() == SUITE_TAG.as_bytes() {
                    return Ok(ScanState::Outside);
                }
                if tag.as_ref() == DIRECTORY_TAG.as_bytes() {
                    if let Some(open) = pending.take() {
                        self.close_directory(open)?;
                    }
                }
            }
            _ => {}
        }
        Ok(ScanState::InsideTarget { pending })
    }

    fn close_directory(&mut self, open: PendingDirectory) -> Result<(), ShardError> {
        let suite = self.suite;
        let path = open.text.trim().to_string();
        if path.is_empty() {
            return Err(self.malformed(format!("suite '{suite}' has an empty <directory> entry")));
        }
        if !self.seen_directories.insert(path.clone()) {
            return Err(self.malformed(format!(
                "suite '{suite}' lists directory '{path}' more than once"
            )));
        }
        self.lookup.directories.push(SuiteDirectory {
            path,
            suffix: open.suffix,
        });
        Ok(())
    }
}

/// Extracts the directories registered under `suite`.
///
/// An absent suite yields an empty `directories` list; deciding whether that
/// is fatal is up to the caller. `origin` only labels error messages.
///
/// 提取在 `suite` 下注册的目录。
/// 套件不存在时返回空的 `directories` 列表；是否视为致命错误由调用者决定。
///
/// # Errors
/// Returns [`ShardError::MalformedDeclaration`] for XML syntax errors, a suite
/// declared twice, a suite nested in the target suite, and empty, duplicated or
/// nested `<directory>` entries.
pub fn parse_suite(document: &str, suite: &str, origin: &Path) -> Result<SuiteLookup, ShardError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut scanner = Scanner {
        suite,
        origin,
        root: None,
        lookup: SuiteLookup::default(),
        seen_suites: HashSet::new(),
        seen_directories: HashSet::new(),
    };
    let mut state = ScanState::Outside;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(err) => {
                let position = reader.error_position();
                return Err(scanner.malformed(format!("{err} (at byte {position})")));
            }
        };

        state = match state {
            ScanState::Outside => scanner.outside(event)?,
            ScanState::InsideTarget { pending } => scanner.inside(pending, event)?,
        };
    }

    if matches!(state, ScanState::InsideTarget { .. }) {
        return Err(scanner.malformed(format!("suite '{suite}' is never closed")));
    }

    let mut lookup = scanner.lookup;
    lookup.root = scanner.root.unwrap_or_default();
    Ok(lookup)
}

fn read_root(element: &BytesStart<'_>) -> Result<DeclarationRoot, String> {
    let mut attributes = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        attributes.push((key, value.into_owned()));
    }
    Ok(DeclarationRoot {
        element: String::from_utf8_lossy(element.name().as_ref()).into_owned(),
        attributes,
    })
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>, String> {
    match element.try_get_attribute(key).map_err(|err| err.to_string())? {
        Some(attr) => {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Renders a declaration as an indented XML document.
///
/// Suites without entries are written as empty elements so the engine still
/// sees every shard name.
///
/// 将声明渲染为带缩进的 XML 文档。
///
/// # Errors
/// Returns [`ShardError::Render`] if the XML writer fails.
pub fn render_declaration(declaration: &SuiteDeclaration) -> Result<Vec<u8>, ShardError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(declaration.root.element.as_str());
    for (key, value) in &declaration.root.attributes {
        root.push_attribute((key.as_str(), value.as_str()));
    }
    emit(&mut writer, Event::Start(root))?;
    emit(&mut writer, Event::Start(BytesStart::new(SUITES_TAG)))?;

    for suite in &declaration.suites {
        let mut start = BytesStart::new(SUITE_TAG);
        start.push_attribute((NAME_ATTR, suite.name.as_str()));
        if suite.entries.is_empty() {
            emit(&mut writer, Event::Empty(start))?;
            continue;
        }
        emit(&mut writer, Event::Start(start))?;

        for entry in &suite.entries {
            let (tag, path, suffix) = match entry {
                SuiteEntry::Directory(dir) => (DIRECTORY_TAG, dir.path.clone(), dir.suffix.as_deref()),
                SuiteEntry::File(file) => (
                    FILE_TAG,
                    file.path.display().to_string(),
                    Some(file.suffix.as_str()),
                ),
            };
            let mut element = BytesStart::new(tag);
            if let Some(suffix) = suffix {
                element.push_attribute((SUFFIX_ATTR, suffix));
            }
            emit(&mut writer, Event::Start(element))?;
            emit(&mut writer, Event::Text(BytesText::new(&path)))?;
            emit(&mut writer, Event::End(BytesEnd::new(tag)))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new(SUITE_TAG)))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new(SUITES_TAG)))?;
    emit(
        &mut writer,
        Event::End(BytesEnd::new(declaration.root.element.as_str())),
    )?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ShardError> {
    writer
        .write_event(event)
        .map_err(|err| ShardError::Render(err.to_string()))
}
