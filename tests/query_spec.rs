use std::fs;
use std::path::Path;

use dsc_notebook::query::{compose_query, write_query_notebook, QueryOptions};
use dsc_notebook::writer::Executor;
use dsc_notebook::NotebookError;
use serde_json::Value;
use speculate2::speculate;

/// Helper returning (cell_type, source, kernel) for every cell.
fn cells(text: &str) -> Vec<(String, String, String)> {
    let doc: Value = serde_json::from_str(text).expect("Notebook is not valid JSON");
    doc["cells"]
        .as_array()
        .expect("Missing cells")
        .iter()
        .map(|cell| {
            let source: Vec<String> =
                serde_json::from_value(cell["source"].clone()).expect("Bad source");
            (
                cell["cell_type"].as_str().unwrap_or_default().to_string(),
                source.concat(),
                cell["metadata"]["kernel"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

fn queries(items: &[&str]) -> Vec<String> {
    items.iter().map(|q| q.to_string()).collect()
}

/// Executor stub that marks the notebook metadata as executed.
struct MarkingExecutor;

impl Executor for MarkingExecutor {
    fn execute(&self, notebook: &str) -> dsc_notebook::Result<String> {
        let mut doc: Value = serde_json::from_str(notebook)?;
        doc["metadata"]["executed"] = Value::Bool(true);
        Ok(doc.to_string())
    }
}

speculate! {
    before {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = Path::new("/data/query.xlsx");
        let options = QueryOptions::default();
    }

    describe "compose_query" {
        it "emits only the title and setup cell for zero queries" {
            let text = compose_query(source, &[], &options).expect("Failed to compose");
            let cells = cells(&text);

            assert_eq!(cells.len(), 2);
            assert!(cells[0].1.starts_with("# Query Results\n"));
            assert_eq!(cells[1].0, "code");
            assert!(cells[1].1.contains("pd.ExcelFile('/data/query.xlsx')"));
            assert!(cells[1].1.contains("info = [xls.parse(x) for x in xls.sheet_names]"));
        }

        it "previews a single query as the merged sheet" {
            let text = compose_query(source, &queries(&["SELECT * FROM a"]), &options)
                .expect("Failed to compose");
            let cells = cells(&text);

            assert_eq!(cells.len(), 5);
            assert_eq!(cells[2].1, "## Merged");
            assert_eq!(cells[3].1, "```sql\nSELECT * FROM a\n```");
            assert_eq!(cells[4].1, "%preview -n info[0] --limit -1");
            assert!(!cells.iter().any(|c| c.1.starts_with("## Pipeline")));
        }

        it "emits a merged preview followed by one section per query" {
            let text = compose_query(
                source,
                &queries(&["SELECT a.x FROM a", "SELECT b.y FROM b WHERE b.z > 1"]),
                &options,
            ).expect("Failed to compose");
            let cells = cells(&text);

            let sources: Vec<&str> = cells.iter().skip(2).map(|c| c.1.as_str()).collect();
            assert_eq!(sources, vec![
                "## Merged",
                "%preview -n info[0] --limit -1",
                "## Pipeline 1",
                "```sql\nSELECT a.x FROM a\n```",
                "%preview -n info[1] --limit -1",
                "## Pipeline 2",
                "```sql\nSELECT b.y FROM b WHERE b.z > 1\n```",
                "%preview -n info[2] --limit -1",
            ]);
        }

        it "hides the query text from the report" {
            let text = compose_query(source, &queries(&["SELECT 1"]), &options)
                .expect("Failed to compose");
            let doc: Value = serde_json::from_str(&text).unwrap();

            assert_eq!(doc["cells"][3]["metadata"]["tags"], serde_json::json!(["hide_output"]));
            assert_eq!(doc["cells"][4]["metadata"]["tags"], serde_json::json!(["report_output"]));
        }

        it "switches to R by reading the workbook" {
            let options = QueryOptions { language: Some("R".to_string()), ..QueryOptions::default() };
            let text = compose_query(source, &queries(&["SELECT 1"]), &options)
                .expect("Failed to compose");
            let cells = cells(&text);

            let last = cells.last().unwrap();
            assert_eq!(last.1, "%use R\ninfo <- readxl::read_excel('/data/query.xlsx')");
            assert_eq!(last.2, "SoS");
        }

        it "switches to other languages by fetching info" {
            let options = QueryOptions { language: Some("Python3".to_string()), ..QueryOptions::default() };
            let text = compose_query(source, &[], &options).expect("Failed to compose");

            assert_eq!(cells(&text).last().unwrap().1, "%use Python3\n%get info");
        }

        it "inlines add-on scripts in the target language" {
            let addon = temp_dir.path().join("plot.R");
            fs::write(&addon, "library(ggplot2)\nqplot(info$x)\n").expect("Failed to write addon");
            let options = QueryOptions {
                language: Some("R".to_string()),
                addons: vec![addon],
                ..QueryOptions::default()
            };

            let text = compose_query(source, &queries(&["SELECT 1"]), &options)
                .expect("Failed to compose");
            let cells = cells(&text);

            let last = cells.last().unwrap();
            assert_eq!(last.0, "code");
            assert_eq!(last.1, "library(ggplot2)\nqplot(info$x)");
            assert_eq!(last.2, "R");
        }

        it "skips add-ons when no language is given" {
            let addon = temp_dir.path().join("plot.R");
            fs::write(&addon, "qplot(info$x)").expect("Failed to write addon");
            let options = QueryOptions { addons: vec![addon], ..QueryOptions::default() };

            let text = compose_query(source, &[], &options).expect("Failed to compose");
            assert_eq!(cells(&text).len(), 2);
        }

        it "skips add-on scripts that are empty" {
            let empty = temp_dir.path().join("empty.R");
            fs::write(&empty, "  \n").expect("Failed to write addon");
            let plot = temp_dir.path().join("plot.R");
            fs::write(&plot, "qplot(info$x)").expect("Failed to write addon");
            let options = QueryOptions {
                language: Some("R".to_string()),
                addons: vec![empty, plot],
                ..QueryOptions::default()
            };

            let text = compose_query(source, &queries(&["SELECT 1"]), &options)
                .expect("Failed to compose");
            let cells = cells(&text);

            assert_eq!(cells.len(), 7);
            assert_eq!(cells[5].1, "%use R\ninfo <- readxl::read_excel('/data/query.xlsx')");
            assert_eq!(cells[6].1, "qplot(info$x)");
        }

        it "names the missing add-on" {
            let present = temp_dir.path().join("present.R");
            fs::write(&present, "1").expect("Failed to write addon");
            let missing = temp_dir.path().join("missing.R");
            let options = QueryOptions {
                language: Some("R".to_string()),
                addons: vec![present, missing.clone()],
                ..QueryOptions::default()
            };

            let err = compose_query(source, &[], &options).unwrap_err();
            match err {
                NotebookError::MissingAddon(path) => assert_eq!(path, missing),
                other => panic!("Unexpected error: {}", other),
            }
        }
    }

    describe "write_query_notebook" {
        it "writes nothing when an add-on is missing" {
            let output = temp_dir.path().join("query.ipynb");
            let missing = temp_dir.path().join("gone.py");
            let options = QueryOptions {
                language: Some("Python3".to_string()),
                addons: vec![missing.clone()],
                ..QueryOptions::default()
            };

            let err = write_query_notebook(source, &queries(&["SELECT 1"]), &output, &options, None)
                .unwrap_err();

            assert!(err.to_string().contains(&missing.display().to_string()));
            assert!(!output.exists());
        }

        it "writes the executed notebook when an executor is given" {
            let output = temp_dir.path().join("query.ipynb");

            write_query_notebook(source, &queries(&["SELECT 1"]), &output, &options, Some(&MarkingExecutor as &dyn Executor))
                .expect("Failed to write");

            let doc: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
            assert_eq!(doc["metadata"]["executed"], true);
            assert_eq!(doc["cells"].as_array().unwrap().len(), 5);
        }
    }
}
