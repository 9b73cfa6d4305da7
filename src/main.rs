use food_quality_backend::*;
use std::env;
use std::fs;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <request_json_file>", args[0]);
        process::exit(1);
    }

    let input_file = &args[1];

    let input_data = match fs::read_to_string(input_file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading request file: {}", e);
            process::exit(1);
        }
    };

    let request: serde_json::Value = match serde_json::from_str(&input_data) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error parsing JSON: {}", e);
            process::exit(1);
        }
    };

    // Detect the request shape
    let is_actual = request.get("metricValue").is_some();
    let is_classify_only = request
        .get("classifyOnly")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let router = PredictionRouter::new(EngineConfig::from_env());

    if is_actual {
        handle_actual_submission(&router, &request);
    } else if is_classify_only {
        handle_classification(&router, &request);
    } else {
        handle_prediction(&router, &request).await;
    }
}

fn handle_actual_submission(router: &PredictionRouter, request: &serde_json::Value) {
    let actual: ActualMeasurement = match serde_json::from_value(request.clone()) {
        Ok(actual) => actual,
        Err(e) => {
            eprintln!("Error parsing actual measurement: {}", e);
            process::exit(1);
        }
    };

    let response = router.submit_actual(&actual);
    print_json(&response);
    if !response.success {
        process::exit(1);
    }
}

fn handle_classification(router: &PredictionRouter, request: &serde_json::Value) {
    let category = match request
        .get("category")
        .and_then(|v| v.as_str())
        .and_then(Category::parse)
    {
        Some(category) => category,
        None => {
            eprintln!("Error: unknown or missing category");
            process::exit(1);
        }
    };
    let claims: Vec<String> = request
        .get("claims")
        .and_then(|v| v.as_array())
        .map(|claims| {
            claims
                .iter()
                .filter_map(|c| c.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();

    match router.classify_claims(category, &claims) {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error classifying claims: {}", e);
            process::exit(1);
        }
    }
}

async fn handle_prediction(router: &PredictionRouter, request: &serde_json::Value) {
    let input: PredictionInput = match serde_json::from_value(request.clone()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error parsing prediction input: {}", e);
            process::exit(1);
        }
    };

    match router.predict_unified(&input).await {
        Ok(result) => print_json(&result),
        Err(e) => {
            eprintln!("Error performing prediction: {}", e);
            process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing results: {}", e);
            process::exit(1);
        }
    }
}
