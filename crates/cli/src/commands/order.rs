//! Order placement: drives the full checkout flow.

use eshop_core::{AddressId, NotificationQueue, ProductId};
use eshop_storefront::checkout::{AddressForm, Checkout, CheckoutStep};
use eshop_storefront::detail::ProductDetail;

use super::CliError;

/// Walk the checkout machine end to end: load the product, validate the
/// quantity, pick or save an address, advance through the steps, submit.
#[allow(clippy::print_stdout)]
pub async fn place(
    product: i64,
    quantity: i64,
    address: Option<i64>,
    new_address: Option<Vec<String>>,
) -> Result<(), CliError> {
    let (api, _) = super::signed_in_client()?;

    let mut detail = ProductDetail::new();
    detail.load(&api, ProductId::new(product)).await?;
    let handoff = detail
        .begin_checkout(quantity)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let mut checkout =
        Checkout::new(handoff).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    checkout.load_item(&api).await?;
    checkout.advance()?;
    debug_assert_eq!(checkout.step(), CheckoutStep::Address);

    checkout.load_addresses(&api).await?;
    let address_id = match (address, new_address) {
        (Some(id), _) => {
            let id = AddressId::new(id);
            checkout.select_address(id)?;
            id
        }
        (None, Some(fields)) => {
            let form = parse_address(&fields)?;
            checkout.create_address(&api, &form).await?
        }
        (None, None) => {
            return Err(CliError::InvalidArgument(
                "pass --address <id> or --new-address <fields>".to_string(),
            ));
        }
    };

    checkout.advance()?;
    if let Some(total) = checkout.draft().and_then(|d| d.total_price()) {
        println!("Total: {total}");
    }

    let mut notifications = NotificationQueue::new();
    checkout.submit_order(&api, &mut notifications).await?;

    if let Some(note) = notifications.pop() {
        println!("{}", note.message);
    }
    println!("Shipping to address {address_id}");
    Ok(())
}

/// Parse `name,contact,street,city,state,zip[,landmark]` into a form.
fn parse_address(fields: &[String]) -> Result<AddressForm, CliError> {
    let field = |index: usize, name: &str| {
        fields.get(index).cloned().ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "--new-address is missing the {name} field \
                 (expected name,contact,street,city,state,zip[,landmark])"
            ))
        })
    };

    Ok(AddressForm {
        name: field(0, "name")?,
        contact_number: field(1, "contact")?,
        street: field(2, "street")?,
        city: field(3, "city")?,
        state: field(4, "state")?,
        zip_code: field(5, "zip")?,
        landmark: fields.get(6).cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_address_without_landmark() {
        let form =
            parse_address(&strings(&["Ada", "555", "1 Main St", "Springfield", "IL", "62704"]))
                .unwrap();
        assert_eq!(form.city, "Springfield");
        assert!(form.landmark.is_empty());
    }

    #[test]
    fn test_parse_address_missing_field() {
        let err = parse_address(&strings(&["Ada", "555"])).unwrap_err();
        assert!(err.to_string().contains("street"));
    }
}
