//! Training job orchestration.
//!
//! Ordering matters in two places: the validation rows are folded into the
//! test set before cleaning, and the fitted model is exported before the
//! report is assembled so a report failure never loses the model.

use crate::cli::logging::{log, LogLevel};
use crate::config::{Cli, DataFormat};
use crate::data::{clean_numeric, data_selection, load_from_object_storage, load_from_warehouse, Table};
use crate::export::{export_model, export_report};
use crate::model::{classification_report, train, weighted_f1, LabelEncoder, PipelineSpec, CV_FOLDS};
use crate::report::{build_report, EXAMPLE_ROWS};
use crate::storage::{ObjectStore, Warehouse};
use crate::{Error, Result};

/// Run the whole training job: load, clean, fit, export.
pub fn run_job(cli: &Cli) -> Result<()> {
    let level = LogLevel::from_flags(cli.verbose, cli.quiet);

    let params = cli.svc_params();
    params.validate()?;
    if cli.model_dir.is_empty() {
        return Err(Error::Input("model_dir is required".to_string()));
    }

    log(
        level,
        LogLevel::Verbose,
        &format!("Model artifacts will be exported to {}", cli.model_dir),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Loading {} data: train={} validation={} test={}",
            cli.data_format, cli.training_data_uri, cli.validation_data_uri, cli.test_data_uri
        ),
    );

    let store = cli.backend_config().build()?;
    let warehouse = cli.warehouse_config().build()?;
    let schema = cli.feature_schema();

    let mut df_train = load_table(cli, store.as_ref(), warehouse.as_ref(), &cli.training_data_uri)?;
    let mut df_test = load_table(cli, store.as_ref(), warehouse.as_ref(), &cli.test_data_uri)?;
    let df_valid = load_table(cli, store.as_ref(), warehouse.as_ref(), &cli.validation_data_uri)?;
    // Validation rows are evaluated alongside the test rows.
    df_test.append(df_valid)?;

    log(
        level,
        LogLevel::Verbose,
        &format!(
            "Loaded {} training rows, {} test rows",
            df_train.n_rows(),
            df_test.n_rows()
        ),
    );

    // Each table is imputed with its own column means.
    clean_numeric(&mut df_train, &schema.numeric_features)?;
    clean_numeric(&mut df_test, &schema.numeric_features)?;

    let (x_train_tbl, y_train_labels) =
        data_selection(&df_train, schema.selected_columns(), &schema.label)?;
    let (x_test_tbl, y_test_labels) =
        data_selection(&df_test, schema.selected_columns(), &schema.label)?;

    let encoder = LabelEncoder::fit(&y_train_labels)?;
    let y_train = encoder.encode(&y_train_labels)?;
    let y_test = encoder.encode(&y_test_labels)?;
    let x_train = x_train_tbl.to_matrix()?;
    let x_test = x_test_tbl.to_matrix()?;

    let spec = PipelineSpec::new(params.clone(), schema.numeric_feature_indices());
    let (pipeline, cv_score) = train(&spec, &x_train, &y_train, CV_FOLDS)?;
    log(
        level,
        LogLevel::Normal,
        &format!("Cross validation score: {cv_score}"),
    );

    // Export before evaluating, a reporting failure must not lose the model.
    let model_uri = export_model(store.as_ref(), &cli.model_dir, &pipeline)?;
    log(level, LogLevel::Normal, &format!("Model exported to {model_uri}"));

    let pred = pipeline.predict(x_test.view());
    let f1 = weighted_f1(&pred.to_vec(), &y_test.to_vec());
    log(level, LogLevel::Normal, &format!("f1score: {f1}"));

    let test_report = classification_report(&pred.to_vec(), &y_test.to_vec(), encoder.classes());
    let report = build_report(cv_score, &params, &test_report, &x_test_tbl.head(EXAMPLE_ROWS))?;
    let report_uri = export_report(store.as_ref(), &cli.model_dir, &report)?;
    log(level, LogLevel::Normal, &format!("Report exported to {report_uri}"));

    log(level, LogLevel::Normal, "Training job completed.");
    Ok(())
}

/// Load one table through the backend selected by the data format.
fn load_table(
    cli: &Cli,
    store: &dyn ObjectStore,
    warehouse: &dyn Warehouse,
    uri: &str,
) -> Result<Table> {
    if uri.is_empty() {
        return Err(Error::Input("data uri is required".to_string()));
    }
    match cli.data_format {
        DataFormat::Csv => load_from_object_storage(store, uri),
        DataFormat::Warehouse => load_from_warehouse(warehouse, uri),
    }
}
