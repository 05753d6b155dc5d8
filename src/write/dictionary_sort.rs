//! `DictionarySorter`: sorts a kept dictionary's entries and rewrites every buffered page's
//! indices from old ids to new ids.

use crate::error::Result;
use crate::metadata::ColumnDescriptor;
use crate::page::PageHolder;
use crate::rle;

use super::column_chunk::DictionaryPageHolder;
use crate::dictionary::DictionaryValueCodec;

/// Sorts `dictionary_page`'s entries into natural order and rewrites every buffered page's
/// dictionary ids to match, returning the sorted dictionary page that should reach the file
/// writer in place of the original.
pub fn apply(
    descriptor: &ColumnDescriptor,
    dictionary_page: DictionaryPageHolder,
    pages: &mut [PageHolder],
    dictionary_value_codec: &dyn DictionaryValueCodec,
) -> Result<DictionaryPageHolder> {
    let dictionary = dictionary_value_codec.init_dictionary(
        dictionary_page.body(),
        dictionary_page.num_values(),
        descriptor.physical_type(),
    )?;

    let old_to_new = dictionary.sort_permutation();
    let sorted_bytes = dictionary.to_sorted_bytes(&old_to_new);
    let width = rle::bit_width(dictionary.len());

    for page in pages.iter_mut() {
        let non_null = page.non_null_value_count();
        match page {
            PageHolder::V1(p) => {
                let old_ids = rle::read_indices(&p.body()[p.get_data_offset()..], non_null)?;
                let new_ids: Vec<u32> = old_ids.iter().map(|&id| old_to_new[id as usize]).collect();
                let encoding = p.values_encoding();
                p.replace_values_portion(rle::write_indices(&new_ids, width), encoding);
            }
            PageHolder::V2(p) => {
                let old_ids = rle::read_indices(p.values_body(), non_null)?;
                let new_ids: Vec<u32> = old_ids.iter().map(|&id| old_to_new[id as usize]).collect();
                let encoding = p.values_encoding();
                p.replace_values_body(rle::write_indices(&new_ids, width), encoding);
            }
        }
    }

    Ok(DictionaryPageHolder::new(sorted_bytes, dictionary_page.num_values(), dictionary_page.encoding()).sorted())
}
