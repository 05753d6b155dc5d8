//! `DictionaryFallback`: decodes dictionary-encoded pages back to plain values and rewrites
//! them with a non-dictionary encoding when the dictionary the column speculatively built
//! turns out not to have been used by every data page.

use crate::encoding::Encoding;
use crate::error::Result;
use crate::metadata::ColumnDescriptor;
use crate::page::PageHolder;
use crate::rle;

use super::column_chunk::DictionaryPageHolder;
use crate::dictionary::DictionaryValueCodec;

/// Rewrites every buffered page whose values encoding still uses the dictionary, in place,
/// as plain-encoded values. Pages that already used a non-dictionary encoding are untouched.
pub fn apply(
    descriptor: &ColumnDescriptor,
    dictionary_page: &DictionaryPageHolder,
    pages: &mut [PageHolder],
    dictionary_value_codec: &dyn DictionaryValueCodec,
) -> Result<()> {
    let dictionary = dictionary_value_codec.init_dictionary(
        dictionary_page.body(),
        dictionary_page.num_values(),
        descriptor.physical_type(),
    )?;

    for page in pages.iter_mut() {
        if !page.values_encoding().uses_dictionary() {
            continue;
        }
        let non_null = page.non_null_value_count();
        match page {
            PageHolder::V1(p) => {
                let indices = rle::read_indices(&p.body()[p.get_data_offset()..], non_null)?;
                let mut out = Vec::new();
                for id in indices {
                    dictionary.write_plain_value(id, &mut out)?;
                }
                p.replace_values_portion(out, Encoding::Plain);
            }
            PageHolder::V2(p) => {
                let indices = rle::read_indices(p.values_body(), non_null)?;
                let mut out = Vec::new();
                for id in indices {
                    dictionary.write_plain_value(id, &mut out)?;
                }
                p.replace_values_body(out, Encoding::Plain);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::PlainDictionaryValueCodec;
    use crate::page::PageHolderV1;
    use crate::schema::types::PhysicalType;

    #[test]
    fn rewrites_dictionary_encoded_pages_as_plain() {
        let descriptor = ColumnDescriptor::new(PhysicalType::Int32, 0, 0, vec!["c".to_string()]);

        let mut dict_bytes = Vec::new();
        for v in [42i32, 99] {
            dict_bytes.extend_from_slice(&v.to_le_bytes());
        }
        let dict_page = DictionaryPageHolder::new(dict_bytes, 2, Encoding::Plain);

        let indices_body = rle::write_indices(&[0, 1], rle::bit_width(2));
        let page = PageHolderV1::new(
            indices_body,
            0,
            2,
            None,
            Encoding::Rle,
            Encoding::Rle,
            Encoding::RleDictionary,
        );
        let mut pages = vec![PageHolder::V1(page)];

        apply(&descriptor, &dict_page, &mut pages, &PlainDictionaryValueCodec).unwrap();

        match &pages[0] {
            PageHolder::V1(p) => {
                assert_eq!(p.values_encoding(), Encoding::Plain);
                let values: Vec<i32> = p
                    .body()
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
                    .collect();
                assert_eq!(values, vec![42, 99]);
            }
            _ => panic!("expected v1 page"),
        }
    }

    #[test]
    fn leaves_non_dictionary_pages_untouched() {
        let descriptor = ColumnDescriptor::new(PhysicalType::Int32, 0, 0, vec!["c".to_string()]);
        let dict_page = DictionaryPageHolder::new(vec![1, 2, 3, 4], 1, Encoding::Plain);

        let plain_body = 100i32.to_le_bytes().to_vec();
        let page = PageHolderV1::new(plain_body.clone(), 4, 1, None, Encoding::Rle, Encoding::Rle, Encoding::Plain);
        let mut pages = vec![PageHolder::V1(page)];

        apply(&descriptor, &dict_page, &mut pages, &PlainDictionaryValueCodec).unwrap();

        match &pages[0] {
            PageHolder::V1(p) => assert_eq!(p.body(), plain_body.as_slice()),
            _ => panic!("expected v1 page"),
        }
    }
}
