use std::cell::RefCell;

use prices_client::prices::{messages::*, types::*, PricesClient};
use st_builtins::{
    client::DispatchError,
    prelude::*,
    xml::{from_xml, to_xml},
};

struct Recorder {
    response: &'static str,
    calls: RefCell<Vec<(String, WireValue)>>,
}

impl Recorder {
    fn new(response: &'static str) -> Self {
        Self {
            response,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ActionDispatcher for Recorder {
    fn invoke(&self, action: &str, arguments: WireValue) -> Result<String, DispatchError> {
        self.calls.borrow_mut().push((action.to_string(), arguments));
        Ok(self.response.to_string())
    }
}

const RESPONSE: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
    <soap:Body>
        <GetPriceResponse xmlns="urn:prices">
            <price>9.50</price>
            <currency>EUR</currency>
            <note>a</note>
            <note>b</note>
        </GetPriceResponse>
    </soap:Body>
</soap:Envelope>"#;

fn request(quantity: Option<i32>) -> GetPriceComplexType {
    GetPriceComplexType::new(
        Children::native(["sku1".to_string()]),
        Children::native(quantity),
    )
    .unwrap()
}

#[test]
fn request_round_trips_through_xml() {
    let request = request(None);
    let xml = to_xml(&request).unwrap();
    assert_eq!(xml, r#"<GetPrice xmlns="urn:prices"><sku>sku1</sku></GetPrice>"#);
    assert_eq!(from_xml::<GetPriceComplexType>(&xml).unwrap(), request);
    assert_eq!(request.sku().map(|sku| sku.value().as_str()), Some("sku1"));
    assert!(request.quantity().is_none());
}

#[test]
fn amounts_keep_their_lexical_pattern() {
    assert!(AmountSimpleType::from_literal("9.50").is_ok());
    assert!(AmountSimpleType::from_literal("9.5").is_err());
    assert!(AmountSimpleType::from_literal("-1.00").is_err());
    assert!(CurrencySimpleType::from_literal("GBP").is_err());
}

#[test]
fn client_calls_the_dispatcher_and_decodes_the_response() {
    let recorder = Recorder::new(RESPONSE);
    let client = PricesClient::new(&recorder);
    let output = client
        .get_price(&GetPriceInMessage::new(request(Some(2))))
        .unwrap();

    let response = &output.parameters;
    assert_eq!(
        response.price(),
        Some(&AmountSimpleType::from_literal("9.50").unwrap())
    );
    assert_eq!(
        response.currency().map(|currency| currency.value().as_str()),
        Some("EUR")
    );
    assert_eq!(response.note().len(), 2);

    let calls = recorder.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (action, arguments) = &calls[0];
    assert_eq!(action, "GetPrice");
    assert_eq!(arguments.get("sku"), Some(&WireValue::Text("sku1".into())));
    assert_eq!(arguments.get("quantity"), Some(&WireValue::Text("2".into())));
}

#[test]
fn invalid_responses_are_rejected() {
    let recorder = Recorder::new(
        r#"<GetPriceResponse xmlns="urn:prices"><price>9.50</price><currency>GBP</currency></GetPriceResponse>"#,
    );
    let client = PricesClient::new(&recorder);
    let result = client.get_price(&GetPriceInMessage::new(request(None)));
    assert!(matches!(result, Err(ClientError::Validation(_))));
}
