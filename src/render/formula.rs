use crate::name::dash_to_studly;

use super::{Resource, render_resource};

const DEFAULT_DESC: &str = "Shiny new formula";

/// Header fields of a formula, taken from the root package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub name: String,
    pub version: String,
    pub summary: Option<String>,
    pub homepage: Option<String>,
    pub url: String,
    pub sha256: String,
    /// Formula the package runs under, e.g. `python3` or `python@3.12`
    pub python: String,
}

/// Render a complete virtualenv formula with `resources` as vendored dependencies.
pub fn render_formula(formula: &Formula, resources: &[Resource]) -> String {
    let stanzas: String = resources
        .iter()
        .map(|r| format!("{}\n\n", render_resource(r)))
        .collect();

    format!(
        r#"class {class} < Formula
  include Language::Python::Virtualenv

  desc "{desc}"
  homepage "{homepage}"
  url "{url}"
  version "{version}"
  sha256 "{sha256}"

  depends_on "{python}"

{stanzas}  def install
    virtualenv_install_with_resources
  end

  test do
    false
  end
end"#,
        class = dash_to_studly(&formula.name),
        desc = formula.summary.as_deref().unwrap_or(DEFAULT_DESC),
        homepage = formula.homepage.as_deref().unwrap_or_default(),
        url = formula.url,
        version = formula.version,
        sha256 = formula.sha256,
        python = formula.python,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula() -> Formula {
        Formula {
            name: "http-prompt".into(),
            version: "2.1.0".into(),
            summary: Some("An interactive HTTP command-line client".into()),
            homepage: Some("https://http-prompt.com".into()),
            url: "https://files.example/http-prompt-2.1.0.tar.gz".into(),
            sha256: "aa".repeat(32),
            python: "python3".into(),
        }
    }

    #[test]
    fn test_render_formula_header() {
        let text = render_formula(&formula(), &[]);
        let expected_head = format!(
            "class HttpPrompt < Formula\n  include Language::Python::Virtualenv\n\n  desc \"An interactive HTTP command-line client\"\n  homepage \"https://http-prompt.com\"\n  url \"https://files.example/http-prompt-2.1.0.tar.gz\"\n  version \"2.1.0\"\n  sha256 \"{}\"\n\n  depends_on \"python3\"\n\n  def install\n",
            "aa".repeat(32)
        );
        assert!(text.starts_with(&expected_head), "{}", text);
        assert!(text.ends_with("  test do\n    false\n  end\nend"));
    }

    #[test]
    fn test_render_formula_resources() {
        let resources = vec![
            Resource {
                name: "click".into(),
                url: "https://files.example/click-8.1.7.tar.gz".into(),
                sha256: "11".repeat(32),
            },
            Resource {
                name: "six".into(),
                url: "https://files.example/six-1.16.0.tar.gz".into(),
                sha256: "22".repeat(32),
            },
        ];
        let text = render_formula(&formula(), &resources);

        assert_eq!(text.matches("  resource \"").count(), 2);
        assert!(text.contains("  depends_on \"python3\"\n\n  resource \"click\" do\n"));
        assert!(text.contains("  end\n\n  resource \"six\" do\n"));
        assert!(text.contains("  end\n\n  def install\n"));
    }

    #[test]
    fn test_render_formula_defaults() {
        let mut f = formula();
        f.summary = None;
        f.homepage = None;
        f.python = "python@3.12".into();
        let text = render_formula(&f, &[]);

        assert!(text.contains("  desc \"Shiny new formula\"\n"));
        assert!(text.contains("  homepage \"\"\n"));
        assert!(text.contains("  depends_on \"python@3.12\"\n"));
    }

    #[test]
    fn test_render_formula_always_carries_version() {
        let mut f = formula();
        f.url = "https://files.example/download?id=42".into();
        let text = render_formula(&f, &[]);
        assert!(text.contains(
            "  url \"https://files.example/download?id=42\"\n  version \"2.1.0\"\n  sha256 "
        ));
        assert_eq!(text.matches("  version \"").count(), 1);
    }
}
