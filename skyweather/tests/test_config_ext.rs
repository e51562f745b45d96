use skyconfig::Config;
use skyweather::config_ext::DEFAULT_REFRESH_INTERVAL_SECS;
use skyweather::{City, WeatherConfigExt};
use tempfile::TempDir;

fn load_config() -> (TempDir, Config) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(temp_dir.path().to_str().unwrap()).unwrap();
    (temp_dir, config)
}

#[test]
fn test_defaults() {
    let (_temp_dir, config) = load_config();

    assert_eq!(
        config.get_weather_base_url().unwrap(),
        "http://api.openweathermap.org/data/2.5/weather"
    );
    assert_eq!(config.get_weather_timeout_secs().unwrap(), 30);
    assert_eq!(
        config.get_weather_refresh_interval_secs().unwrap(),
        DEFAULT_REFRESH_INTERVAL_SECS
    );

    let cities = config.get_weather_cities().unwrap();
    let names: Vec<_> = cities.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Orlando, US", "Tokyo, JP", "London, UK", "Sydney, AU", "Cairo, EG"]
    );
}

#[test]
fn test_cities_round_trip() {
    let (_temp_dir, config) = load_config();
    let cities = vec![City::new("Paris", "fr", "Paris, FR")];

    config.set_weather_cities(&cities).unwrap();
    assert_eq!(config.get_weather_cities().unwrap(), cities);
}

#[test]
fn test_empty_city_list_falls_back_to_defaults() {
    let (_temp_dir, config) = load_config();

    config.set_weather_cities(&[]).unwrap();
    assert_eq!(config.get_weather_cities().unwrap().len(), 5);
}

#[test]
fn test_create_weather_client() {
    let (_temp_dir, config) = load_config();
    config
        .set_weather_base_url("http://localhost:8080/weather".to_string())
        .unwrap();
    config.set_weather_api_key("abc".to_string()).unwrap();

    let client = config.create_weather_client().unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080/weather");
}
