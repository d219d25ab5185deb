//! Single-file component re-assembly.

use crate::error::{TransformError, TransformErrorKind, TransformWarning};
use crate::transform::{transform_script, TransformOptions};
use text_size::TextSize;

/// The result of transforming a `.vue` file.
#[derive(Debug, Clone)]
pub struct SfcTransformResult {
    /// The whole file with the script block rewritten.
    pub code: String,
    /// Warnings, with spans relative to the file.
    pub warnings: Vec<TransformWarning>,
}

/// Rewrites the `<script>` block of a single-file component. Every byte
/// outside the script content is preserved.
///
/// The script language comes from the block's `lang` attribute; the `lang`
/// field of `options` is ignored.
pub fn transform_sfc(
    source: &str,
    options: &TransformOptions,
) -> Result<SfcTransformResult, TransformError> {
    let parsed = vue_sfc_parser::parse(source);
    if let Some(error) = parsed.errors.into_iter().next() {
        let span = error.span;
        return Err(TransformError::new(TransformErrorKind::Sfc(error), span));
    }

    let descriptor = parsed.descriptor;
    let Some(script) = descriptor.script else {
        let kind = if descriptor.script_setup.is_some() {
            TransformErrorKind::AlreadyComposition
        } else {
            TransformErrorKind::NoScriptBlock
        };
        return Err(TransformError::unlocated(kind));
    };

    let offset: TextSize = script.content_span.start();
    let script_options = TransformOptions {
        lang: script.lang,
        ..options.clone()
    };
    log::debug!("transforming <script lang={:?}> at {:?}", script.lang, script.content_span);

    let result =
        transform_script(&script.content, &script_options).map_err(|err| err.shifted(offset))?;

    let start = usize::from(script.content_span.start());
    let end = usize::from(script.content_span.end());
    let mut code = String::with_capacity(source.len() + result.code.len());
    code.push_str(&source[..start]);
    // Keep the script on its own lines between the tags.
    if !result.code.starts_with('\n') {
        code.push('\n');
    }
    code.push_str(&result.code);
    if !result.code.ends_with('\n') {
        code.push('\n');
    }
    code.push_str(&source[end..]);

    Ok(SfcTransformResult {
        code,
        warnings: result
            .warnings
            .into_iter()
            .map(|warning| warning.shifted(offset))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_script_block() {
        let err = transform_sfc("<template><div /></template>", &TransformOptions::default())
            .expect_err("no script");
        assert_eq!(err.kind, TransformErrorKind::NoScriptBlock);
    }

    #[test]
    fn test_script_setup_only() {
        let err = transform_sfc(
            "<script setup>const a = 1</script>",
            &TransformOptions::default(),
        )
        .expect_err("already composition");
        assert_eq!(err.kind, TransformErrorKind::AlreadyComposition);
    }

    #[test]
    fn test_unclosed_script() {
        let err = transform_sfc("<script>export default {}", &TransformOptions::default())
            .expect_err("unclosed");
        assert!(matches!(err.kind, TransformErrorKind::Sfc(_)));
    }

    #[test]
    fn test_error_span_is_file_relative() {
        let source = "<template><p /></template>\n<script>\nexport default {\n</script>\n";
        let err = transform_sfc(source, &TransformOptions::default()).expect_err("syntax");
        assert!(matches!(err.kind, TransformErrorKind::Syntax { .. }));
        let script_start = source.find("\nexport").expect("script") as u32;
        let span = err.span.expect("span");
        assert!(u32::from(span.start()) >= script_start);
    }
}
