use serde_json::Value;

/// Masks credential-bearing fields in a JSON payload before it is logged.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, val) in map {
                let sanitized_val = match classify(key) {
                    Sensitivity::Secret => Value::String("****".to_string()),
                    Sensitivity::Token => mask_value(val),
                    Sensitivity::Plain => sanitize_json(val),
                };
                sanitized.insert(key.clone(), sanitized_val);
            }
            Value::Object(sanitized)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

enum Sensitivity {
    Secret,
    Token,
    Plain,
}

fn classify(key: &str) -> Sensitivity {
    match key.to_lowercase().as_str() {
        "password" | "newpassword" | "password_hash" | "passwordhash" | "secret" | "jwt_secret" => {
            Sensitivity::Secret
        }
        "token" | "authorization" | "api_key" => Sensitivity::Token,
        _ => Sensitivity::Plain,
    }
}

// Keeps the ends of long tokens so log lines can still be correlated.
fn mask_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.len() > 8 && s.is_ascii() => {
            Value::String(format!("{}****{}", &s[..4], &s[s.len() - 4..]))
        }
        _ => Value::String("****".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_fully_masked() {
        let input = json!({
            "email": "jane.doe@gmail.com",
            "password": "P@ssw0rd123!"
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["password"], "****");
        assert_eq!(sanitized["email"], "jane.doe@gmail.com");
    }

    #[test]
    fn test_token_keeps_ends() {
        let input = json!({ "token": "eyJhbGciOiJIUzI1NiJ9.payload.signature" });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["token"], "eyJh****ture");
    }

    #[test]
    fn test_sanitize_nested() {
        let input = json!({
            "user": {
                "fullName": "Jane Doe",
                "token": "short"
            },
            "users": [{ "Password": "abc" }]
        });

        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["user"]["token"], "****");
        assert_eq!(sanitized["user"]["fullName"], "Jane Doe");
        assert_eq!(sanitized["users"][0]["Password"], "****");
    }
}
